//! Calibration inputs and driver configuration.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Microvolts;
use crate::cvb::tables::{
    GM20B_CVB_COEF, GM20B_NA_CVB_COEF, SPEEDO_TO_VMIN, THERM_VFLOOR_UV, THERMAL_BOUNDARIES_C,
};
use crate::cvb::{CoefTable, CurveModel};
use crate::error::{Error, Result};

/// Speedo calibration read from fuses by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Speedo {
    /// Silicon bin. Selects the curve model and the minimum voltage.
    pub id: u32,
    /// Measured speedo value fed into the curve polynomial.
    pub value: i32,
}

impl Speedo {
    pub fn new(id: u32, value: i32) -> Self {
        Self { id, value }
    }
}

/// How temperature enters extended-model curve evaluation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ThermalCompensation {
    /// Every zone evaluates at the fixed reference temperature, so zones
    /// differ only in their clamps.
    #[default]
    Fixed,
    /// Each zone evaluates at its lower boundary temperature.
    PerZone,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoltConfig {
    /// Speedo calibration of this chip.
    pub speedo: Speedo,

    /// Upper bound handed to the regulator with every voltage request
    /// (µV). Table entries above it are refused.
    pub max_uv: Microvolts,

    /// Temperature handling for the extended curve model.
    pub thermal_compensation: ThermalCompensation,

    /// Name the cooling device is registered under.
    pub cooling_device_name: String,
}

impl Default for VoltConfig {
    fn default() -> Self {
        Self {
            speedo: Speedo::default(),
            max_uv: 1_200_000,
            thermal_compensation: ThermalCompensation::Fixed,
            cooling_device_name: "gpu_dvfs".to_string(),
        }
    }
}

/// Per-chip-family calibration data.
///
/// Treated as constants once loaded. [`ChipCalibration::gm20b`] carries
/// the built-in values; other families can be loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChipCalibration {
    /// Curve used for speedo id 0.
    pub legacy: CoefTable,

    /// Curve used for speedo ids 1 and up.
    pub extended: CoefTable,

    /// Minimum voltage per speedo id. Its length fixes the highest
    /// supported id.
    pub speedo_to_vmin: Vec<Microvolts>,

    /// Floor applied to the coldest thermal zone (µV).
    pub vfloor_uv: Microvolts,

    /// Ascending thermal boundaries (°C), last entry a sentinel.
    pub thermal_boundaries_c: Vec<i32>,
}

impl ChipCalibration {
    pub fn gm20b() -> Self {
        Self {
            legacy: CoefTable::new(CurveModel::Legacy, GM20B_CVB_COEF),
            extended: CoefTable::new(CurveModel::Extended, GM20B_NA_CVB_COEF),
            speedo_to_vmin: SPEEDO_TO_VMIN.to_vec(),
            vfloor_uv: THERM_VFLOOR_UV,
            thermal_boundaries_c: THERMAL_BOUNDARIES_C.to_vec(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Highest speedo id this calibration covers.
    pub fn max_speedo(&self) -> u32 {
        self.speedo_to_vmin.len().saturating_sub(1) as u32
    }

    /// Coefficient table for a speedo id. Does not range-check `id`.
    pub fn coef_table(&self, id: u32) -> &CoefTable {
        if id >= 1 {
            &self.extended
        } else {
            &self.legacy
        }
    }

    /// Unrounded minimum voltage for a speedo id.
    pub fn vmin(&self, id: u32) -> Result<Microvolts> {
        self.speedo_to_vmin
            .get(id as usize)
            .copied()
            .ok_or(Error::UnsupportedSpeedo {
                id,
                max: self.max_speedo(),
            })
    }
}

impl Default for ChipCalibration {
    fn default() -> Self {
        Self::gm20b()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cvb::tables::MAX_SPEEDO;

    #[test]
    fn should_cover_speedo_ids_up_to_max() {
        let calibration = ChipCalibration::gm20b();
        assert_eq!(calibration.max_speedo(), MAX_SPEEDO);
        assert_eq!(calibration.vmin(2).unwrap(), 818750);
        assert!(matches!(
            calibration.vmin(MAX_SPEEDO + 1),
            Err(Error::UnsupportedSpeedo { id: 5, max: 4 })
        ));
    }

    #[test]
    fn should_select_table_by_speedo_id() {
        let calibration = ChipCalibration::gm20b();
        assert_eq!(calibration.coef_table(0).model, CurveModel::Legacy);
        assert_eq!(calibration.coef_table(0).len(), 12);
        assert_eq!(calibration.coef_table(1).model, CurveModel::Extended);
        assert_eq!(calibration.coef_table(4).len(), 13);
    }

    #[test]
    fn should_load_calibration_from_json() {
        let json = r#"{
            "legacy": { "model": "legacy", "rows": [ { "c0": 900000, "c1": 0, "c2": 0 } ] },
            "extended": {
                "model": "extended",
                "rows": [ { "c0": 800000, "c1": 1, "c2": 2, "c3": 3, "c4": 4, "c5": 5 } ]
            },
            "speedo_to_vmin": [ 850000, 800000 ],
            "vfloor_uv": 900000,
            "thermal_boundaries_c": [ -20, 50, 51 ]
        }"#;

        let calibration = ChipCalibration::from_json(json).unwrap();
        assert_eq!(calibration.max_speedo(), 1);
        assert_eq!(calibration.legacy.rows[0].c3, 0);
        assert_eq!(calibration.extended.rows[0].c5, 5);
        assert_eq!(calibration.thermal_boundaries_c, vec![-20, 50, 51]);
    }

    #[test]
    fn should_reject_malformed_calibration() {
        let err = ChipCalibration::from_json("{ \"legacy\": 3 }").unwrap_err();
        assert!(matches!(err, Error::InvalidCalibration(_)));
    }

    #[test]
    fn should_fill_missing_config_fields_with_defaults() {
        let config: VoltConfig =
            serde_json::from_str(r#"{ "speedo": { "id": 2, "value": 1650 } }"#).unwrap();
        assert_eq!(config.speedo, Speedo::new(2, 1650));
        assert_eq!(config.max_uv, 1_200_000);
        assert_eq!(config.thermal_compensation, ThermalCompensation::Fixed);
        assert_eq!(config.cooling_device_name, "gpu_dvfs");
    }

    #[test]
    fn should_parse_compensation_names() {
        assert_eq!(
            "per-zone".parse::<ThermalCompensation>().unwrap(),
            ThermalCompensation::PerZone
        );
    }
}
