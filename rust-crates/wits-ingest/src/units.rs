//! Metric → oilfield unit conversions
//!
//! Each conversion is a fixed multiplicative factor, except temperature.

/// Metres to feet
pub const M_TO_FT: f64 = 3.28084;
/// Kilo-kilogram-force to kilo-pounds-force
pub const KKGF_TO_KLBF: f64 = 2.20462;
/// Kilo-Newton-metres to kilo-foot-pounds
pub const KNM_TO_KFTLB: f64 = 0.737562;
/// Metres per hour to feet per hour
pub const MH_TO_FTHR: f64 = 3.28084;
/// Kilopascals to PSI
pub const KPA_TO_PSI: f64 = 0.145038;
/// Litres per minute to gallons per minute
pub const LMIN_TO_GPM: f64 = 0.264172;
/// Grams per cm³ to pounds per gallon
pub const GCM3_TO_PPG: f64 = 8.34540;
/// Cubic metres to barrels
pub const M3_TO_BBL: f64 = 6.28981;

/// Depth or length: metres → feet.
pub fn metres_to_feet(m: f64) -> f64 {
    m * M_TO_FT
}

/// Force: kkgf → klbf.
pub fn kkgf_to_klbf(kkgf: f64) -> f64 {
    kkgf * KKGF_TO_KLBF
}

/// Torque: kN·m → kft·lbf.
pub fn knm_to_kftlb(knm: f64) -> f64 {
    knm * KNM_TO_KFTLB
}

/// Rate of penetration: m/h → ft/h.
pub fn mh_to_fthr(mh: f64) -> f64 {
    mh * MH_TO_FTHR
}

/// Pressure: kPa → psi.
pub fn kpa_to_psi(kpa: f64) -> f64 {
    kpa * KPA_TO_PSI
}

/// Flow: L/min → gal/min.
pub fn lmin_to_gpm(lmin: f64) -> f64 {
    lmin * LMIN_TO_GPM
}

/// Density: g/cm³ → ppg.
pub fn gcm3_to_ppg(gcm3: f64) -> f64 {
    gcm3 * GCM3_TO_PPG
}

/// Volume: m³ → bbl.
pub fn m3_to_bbl(m3: f64) -> f64 {
    m3 * M3_TO_BBL
}

/// Temperature: °C → °F.
///
/// Exactly 0.0 °C is the missing-data sentinel and maps to 0.0, not 32.0,
/// so an absent sensor never reads as a plausible 32 °F.
pub fn celsius_to_fahrenheit(c: f64) -> f64 {
    if c == 0.0 {
        return 0.0;
    }
    c * 9.0 / 5.0 + 32.0
}
