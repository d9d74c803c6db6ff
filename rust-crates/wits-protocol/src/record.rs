use serde::{Deserialize, Serialize};

/// One time sample of drilling data in oilfield units, ready for framing.
///
/// Every field defaults to `0.0`. A value of `0.0` is either a real
/// measurement or a placeholder for a channel the source did not carry;
/// the two cases are indistinguishable once a record is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    /// Bit depth (ft)
    pub bit_depth: f64,
    /// Hole depth (ft)
    pub hole_depth: f64,
    /// Weight on bit (klbf)
    pub wob: f64,
    /// Surface torque (kft-lbf)
    pub torque: f64,
    /// Rotary speed (RPM)
    pub rpm: f64,
    /// Rate of penetration (ft/hr)
    pub rop: f64,
    /// Hook load (klbf)
    pub hook_load: f64,
    /// Standpipe pressure (psi)
    pub spp: f64,
    /// Mud flow in (gpm)
    pub flow_in: f64,
    /// Mud weight in (ppg)
    pub mw_in: f64,
    /// Mud weight out (ppg)
    pub mw_out: f64,
    /// Equivalent circulating density (ppg)
    pub ecd: f64,
    /// Mud temperature in (°F)
    pub temp_in: f64,
    /// Mud temperature out (°F)
    pub temp_out: f64,
    /// Total gas (%)
    pub gas: f64,
    /// Pump rate (strokes/min)
    pub pump_spm: f64,
    /// Pit volume (bbl)
    pub pit_volume: f64,
    /// Block position (ft)
    pub block_pos: f64,
}

impl CanonicalRecord {
    /// True when every field is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.bit_depth,
            self.hole_depth,
            self.wob,
            self.torque,
            self.rpm,
            self.rop,
            self.hook_load,
            self.spp,
            self.flow_in,
            self.mw_in,
            self.mw_out,
            self.ecd,
            self.temp_in,
            self.temp_out,
            self.gas,
            self.pump_spm,
            self.pit_volume,
            self.block_pos,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_all_zero() {
        let record = CanonicalRecord::default();
        assert_eq!(record.bit_depth, 0.0);
        assert_eq!(record.block_pos, 0.0);
        assert!(record.is_finite());
    }

    #[test]
    fn test_non_finite_detected() {
        let record = CanonicalRecord {
            ecd: f64::NAN,
            ..Default::default()
        };
        assert!(!record.is_finite());

        let record = CanonicalRecord {
            spp: f64::INFINITY,
            ..Default::default()
        };
        assert!(!record.is_finite());
    }

    #[test]
    fn test_json_serialization() {
        let record = CanonicalRecord {
            bit_depth: 3280.84,
            rpm: 120.0,
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"bit_depth\":3280.84"));
        assert!(json.contains("\"rpm\":120.0"));
    }
}
