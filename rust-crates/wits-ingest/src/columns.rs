//! Header → field mapping for Volve / Kaggle drilling CSVs
//!
//! Each header cell is lower-cased, trimmed and tested against an ordered
//! rule list. The first rule that matches decides what that column is.
//! When several columns resolve to the same field, the later column
//! overwrites the earlier one, so the last matching column wins.

/// Semantic fields extracted from a data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    BitDepth,
    HoleDepth,
    Wob,
    Torque,
    Rpm,
    Rop,
    Spp,
    HookLoad,
    FlowIn,
    MwIn,
    MwOut,
    Ecd,
    TempIn,
    TempOut,
    Gas,
    PumpSpm,
    PitVolume,
    BlockPos,
}

impl Field {
    pub const COUNT: usize = 18;

    pub const ALL: [Field; Field::COUNT] = [
        Field::BitDepth,
        Field::HoleDepth,
        Field::Wob,
        Field::Torque,
        Field::Rpm,
        Field::Rop,
        Field::Spp,
        Field::HookLoad,
        Field::FlowIn,
        Field::MwIn,
        Field::MwOut,
        Field::Ecd,
        Field::TempIn,
        Field::TempOut,
        Field::Gas,
        Field::PumpSpm,
        Field::PitVolume,
        Field::BlockPos,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// What a matched column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    /// Timestamp column, used only for diagnostics
    Time,
    Field(Field),
}

/// How a rule tests a normalized header cell.
#[derive(Debug, Clone, Copy)]
enum Matcher {
    Exact(&'static [&'static str]),
    Prefix(&'static [&'static str]),
}

impl Matcher {
    fn matches(&self, header: &str) -> bool {
        match self {
            Matcher::Exact(names) => names.iter().any(|n| header == *n),
            Matcher::Prefix(prefixes) => prefixes.iter().any(|p| header.starts_with(p)),
        }
    }
}

struct ColumnRule {
    matcher: Matcher,
    target: Target,
}

const fn prefix(prefixes: &'static [&'static str], field: Field) -> ColumnRule {
    ColumnRule {
        matcher: Matcher::Prefix(prefixes),
        target: Target::Field(field),
    }
}

/// Rules in priority order; evaluated top to bottom for every header cell.
const RULES: &[ColumnRule] = &[
    ColumnRule {
        matcher: Matcher::Exact(&["time time", "datetime parsed"]),
        target: Target::Time,
    },
    prefix(&["bit depth"], Field::BitDepth),
    prefix(&["total depth", "hole depth"], Field::HoleDepth),
    prefix(&["weight on bit"], Field::Wob),
    prefix(&["average surface torque"], Field::Torque),
    prefix(&["average rotary speed"], Field::Rpm),
    prefix(&["rate of penetration"], Field::Rop),
    prefix(&["stand pipe pressure"], Field::Spp),
    prefix(&["total hookload"], Field::HookLoad),
    prefix(&["mud flow in"], Field::FlowIn),
    prefix(&["mud density in"], Field::MwIn),
    prefix(&["mud density out"], Field::MwOut),
    prefix(&["equivalent circulating"], Field::Ecd),
    prefix(&["tmp in"], Field::TempIn),
    prefix(&["temperature out"], Field::TempOut),
    prefix(&["gas (avg)"], Field::Gas),
    prefix(&["total spm"], Field::PumpSpm),
    prefix(&["tank volume"], Field::PitVolume),
    prefix(&["block position"], Field::BlockPos),
];

fn normalize(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

fn classify(header: &str) -> Option<Target> {
    let header = normalize(header);
    RULES
        .iter()
        .find(|rule| rule.matcher.matches(&header))
        .map(|rule| rule.target)
}

/// Column index for each semantic field, built once from the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    fields: [Option<usize>; Field::COUNT],
    time: Option<usize>,
}

impl ColumnMap {
    /// Build the map from header cells.
    pub fn from_header<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = Self::default();

        for (idx, cell) in header.into_iter().enumerate() {
            match classify(cell.as_ref()) {
                Some(Target::Time) => map.time = Some(idx),
                Some(Target::Field(field)) => map.fields[field.index()] = Some(idx),
                None => {}
            }
        }

        map
    }

    /// Column index for `field`, if the header carried it.
    pub fn get(&self, field: Field) -> Option<usize> {
        self.fields[field.index()]
    }

    /// Column index of the timestamp column, if any.
    pub fn time(&self) -> Option<usize> {
        self.time
    }

    /// Number of the 18 fields that were found in the header.
    pub fn mapped_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_some()).count()
    }

    /// Fields the header did not provide.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }
}
