//! Thermal zones and cooling-device registration.

mod cooling;

use serde::Serialize;

use crate::error::{Error, Result};

pub use cooling::{CoolingError, CoolingHost, CoolingId, CoolingRegistration};

/// Most thermal zones a scale table may have.
pub const MAX_THERMAL_LIMITS: usize = 8;

/// Ascending zone boundaries in °C.
///
/// Zone `j` covers `[boundaries[j], boundaries[j + 1])`. The last boundary
/// only closes the final zone and is never used as a trip, so there is one
/// zone fewer than there are boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThermalTable {
    boundaries_c: Vec<i32>,
}

impl ThermalTable {
    pub fn new(boundaries_c: impl Into<Vec<i32>>) -> Result<Self> {
        let boundaries_c = boundaries_c.into();

        let zones = boundaries_c.len().saturating_sub(1);
        if zones > MAX_THERMAL_LIMITS {
            return Err(Error::ThermalTableTooLarge {
                zones,
                max: MAX_THERMAL_LIMITS,
            });
        }
        if zones == 0 {
            return Err(Error::InvalidThermalTable(format!(
                "need at least two boundaries, got {}",
                boundaries_c.len()
            )));
        }
        if let Some(pair) = boundaries_c.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidThermalTable(format!(
                "boundaries not ascending at {}°C -> {}°C",
                pair[0], pair[1]
            )));
        }

        Ok(Self { boundaries_c })
    }

    /// Number of zones (`therm_nr`).
    pub fn zones(&self) -> usize {
        self.boundaries_c.len() - 1
    }

    pub fn boundaries_c(&self) -> &[i32] {
        &self.boundaries_c
    }

    /// Lower bound of `zone` in °C.
    pub fn zone_floor_c(&self, zone: usize) -> Option<i32> {
        (zone < self.zones()).then(|| self.boundaries_c[zone])
    }

    /// Zone containing `temp_millideg`, clamped to the valid zones.
    ///
    /// Boundaries are compared in millidegrees so that readings such as
    /// -10.5°C fall below a -10°C boundary.
    pub fn select_zone(&self, temp_millideg: i32) -> usize {
        let temp = i64::from(temp_millideg);
        self.boundaries_c[1..self.zones()]
            .iter()
            .take_while(|&&boundary| i64::from(boundary) * 1000 <= temp)
            .count()
    }
}
