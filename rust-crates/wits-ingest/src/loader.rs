//! CSV → canonical record loading

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};
use wits_protocol::CanonicalRecord;

use crate::columns::{ColumnMap, Field};
use crate::error::{IngestError, Result};
use crate::units;

/// Cell texts that mean "no value" (compared case-insensitively after trim).
const NULL_MARKERS: &[&str] = &["nan", "null", "-", ""];

/// Magnitude below which a channel counts as zero for gap detection.
const SENSOR_GAP_EPSILON: f64 = 1e-10;

/// First and last timestamp text seen among emitted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSpan {
    pub first: String,
    pub last: String,
}

/// Result of one ingestion pass.
#[derive(Debug, Clone)]
pub struct IngestReport {
    /// Records in source row order
    pub records: Vec<CanonicalRecord>,
    /// Data rows read (emitted + skipped)
    pub rows_read: usize,
    /// Rows dropped as sensor-feed gaps
    pub skipped: usize,
    /// Source time span, when the file has a time column
    pub time_span: Option<TimeSpan>,
}

impl IngestReport {
    /// Minimum and maximum positive bit depth (ft).
    pub fn depth_range_ft(&self) -> Option<(f64, f64)> {
        self.records
            .iter()
            .map(|r| r.bit_depth)
            .filter(|d| *d > 0.0)
            .fold(None, |range, d| match range {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }

    /// Wall-clock time one pass takes at `speed` records per second.
    pub fn replay_duration(&self, speed: f64) -> Duration {
        if !(speed > 0.0 && speed.is_finite()) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.records.len() as f64 / speed).unwrap_or(Duration::MAX)
    }
}

/// Raw metric values of one data row, indexed by [`Field`].
#[derive(Debug, Clone, Copy, Default)]
struct RawSample {
    values: [f64; Field::COUNT],
}

impl RawSample {
    fn from_row(row: &StringRecord, map: &ColumnMap) -> Self {
        let mut sample = Self::default();
        for (slot, field) in sample.values.iter_mut().zip(Field::ALL) {
            *slot = cell_value(row, map.get(field));
        }
        sample
    }

    fn get(&self, field: Field) -> f64 {
        self.values[field as usize]
    }

    /// Sensor-feed gap: the five key drilling channels all read zero.
    ///
    /// Other channels are not consulted.
    fn is_sensor_gap(&self) -> bool {
        [Field::Wob, Field::Rpm, Field::Rop, Field::Spp, Field::BitDepth]
            .iter()
            .all(|f| self.get(*f).abs() < SENSOR_GAP_EPSILON)
    }

    fn to_canonical(&self) -> CanonicalRecord {
        let bit_depth = self.get(Field::BitDepth);
        // Fallback is decided on the raw metric value
        let hole_depth = match self.get(Field::HoleDepth) {
            h if h != 0.0 => h,
            _ => bit_depth,
        };

        CanonicalRecord {
            bit_depth: finite(units::metres_to_feet(bit_depth)),
            hole_depth: finite(units::metres_to_feet(hole_depth)),
            wob: finite(units::kkgf_to_klbf(self.get(Field::Wob))),
            torque: finite(units::knm_to_kftlb(self.get(Field::Torque))),
            rpm: self.get(Field::Rpm),
            rop: finite(units::mh_to_fthr(self.get(Field::Rop))),
            hook_load: finite(units::kkgf_to_klbf(self.get(Field::HookLoad))),
            spp: finite(units::kpa_to_psi(self.get(Field::Spp))),
            flow_in: finite(units::lmin_to_gpm(self.get(Field::FlowIn))),
            mw_in: finite(units::gcm3_to_ppg(self.get(Field::MwIn))),
            mw_out: finite(units::gcm3_to_ppg(self.get(Field::MwOut))),
            ecd: finite(units::gcm3_to_ppg(self.get(Field::Ecd))),
            temp_in: finite(units::celsius_to_fahrenheit(self.get(Field::TempIn))),
            temp_out: finite(units::celsius_to_fahrenheit(self.get(Field::TempOut))),
            gas: self.get(Field::Gas),
            pump_spm: self.get(Field::PumpSpm),
            pit_volume: finite(units::m3_to_bbl(self.get(Field::PitVolume))),
            block_pos: finite(units::metres_to_feet(self.get(Field::BlockPos))),
        }
    }
}

/// Overflowed conversions collapse to the 0.0 default.
fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Read a numeric cell, cleaning anything unusable to 0.0.
fn cell_value(row: &StringRecord, idx: Option<usize>) -> f64 {
    let Some(text) = idx.and_then(|i| row.get(i)) else {
        return 0.0;
    };

    let text = text.trim();
    if NULL_MARKERS.iter().any(|m| text.eq_ignore_ascii_case(m)) {
        return 0.0;
    }

    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Load a drilling CSV file.
///
/// # Errors
/// - [`IngestError::Open`] if the file cannot be opened
/// - [`IngestError::Csv`] if the table cannot be read
/// - [`IngestError::NoUsableRecords`] if every row was filtered out
pub fn load_csv(path: impl AsRef<Path>) -> Result<IngestReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Loading {}", path.display());
    load_from_reader(file)
}

/// Load drilling CSV data from any reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<IngestReport> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let map = ColumnMap::from_header(csv.headers()?.iter());
    debug!("Mapped {}/{} fields from header", map.mapped_count(), Field::COUNT);
    let missing = map.missing();
    if !missing.is_empty() {
        warn!("Columns not found (will read as 0.0): {:?}", missing);
    }

    let mut records = Vec::new();
    let mut rows_read = 0usize;
    let mut skipped = 0usize;
    let mut time_span: Option<TimeSpan> = None;

    for row in csv.records() {
        let row = row?;
        // Rows of empty cells are not data rows
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows_read += 1;

        let sample = RawSample::from_row(&row, &map);
        if sample.is_sensor_gap() {
            skipped += 1;
            continue;
        }

        if let Some(ts) = map.time().and_then(|i| row.get(i)).map(str::trim) {
            if !ts.is_empty() {
                match time_span.as_mut() {
                    Some(span) => span.last = ts.to_string(),
                    None => {
                        time_span = Some(TimeSpan {
                            first: ts.to_string(),
                            last: ts.to_string(),
                        })
                    }
                }
            }
        }

        records.push(sample.to_canonical());
    }

    if records.is_empty() {
        return Err(IngestError::NoUsableRecords { rows_read, skipped });
    }

    debug!("Ingested {} records, skipped {} gap rows", records.len(), skipped);

    Ok(IngestReport {
        records,
        rows_read,
        skipped,
        time_span,
    })
}
