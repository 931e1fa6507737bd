//! Voltage scale table construction.
//!
//! A scale table holds, for every thermal zone and every frequency step,
//! the lowest voltage that step may run at. It is computed once from the
//! chip's calibration and never changes afterwards.

use serde::Serialize;

use crate::Microvolts;
use crate::config::{ChipCalibration, Speedo, ThermalCompensation};
use crate::cvb::CurveModel;
use crate::error::{Error, Result};
use crate::regulator::{VoltageSteps, round_voltage};
use crate::thermal::ThermalTable;
use crate::tracing::prelude::*;

/// One cell of the scale table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoltageEntry {
    /// Quantized and clamped voltage.
    pub uv: Microvolts,
    /// Frequency step this voltage belongs to.
    pub vid: usize,
}

/// Voltages indexed by `[zone][step]`, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaleTable {
    model: CurveModel,
    vid_nr: usize,
    vmin_uv: Microvolts,
    vfloor_uv: Microvolts,
    thermal: ThermalTable,
    entries: Vec<VoltageEntry>,
}

impl ScaleTable {
    /// Number of thermal zones (`therm_nr`).
    pub fn zones(&self) -> usize {
        self.thermal.zones()
    }

    /// Number of frequency steps per zone (`vid_nr`).
    pub fn vid_nr(&self) -> usize {
        self.vid_nr
    }

    pub fn model(&self) -> CurveModel {
        self.model
    }

    /// Rounded per-bin minimum every entry respects.
    pub fn vmin_uv(&self) -> Microvolts {
        self.vmin_uv
    }

    /// Rounded floor the coldest zone respects.
    pub fn vfloor_uv(&self) -> Microvolts {
        self.vfloor_uv
    }

    pub fn thermal(&self) -> &ThermalTable {
        &self.thermal
    }

    pub fn row(&self, zone: usize) -> Option<&[VoltageEntry]> {
        if zone >= self.zones() {
            return None;
        }
        let start = zone * self.vid_nr;
        Some(&self.entries[start..start + self.vid_nr])
    }

    pub fn entry(&self, zone: usize, step: usize) -> Option<VoltageEntry> {
        self.row(zone)?.get(step).copied()
    }

    /// Rows from the coldest zone up.
    pub fn rows(&self) -> impl Iterator<Item = &[VoltageEntry]> + '_ {
        (0..self.zones()).filter_map(move |zone| self.row(zone))
    }
}

/// Builds a [`ScaleTable`] from calibration data and the rail's steps.
pub struct ScaleTableBuilder<'a, S: ?Sized> {
    calibration: &'a ChipCalibration,
    steps: &'a S,
    compensation: ThermalCompensation,
}

impl<'a, S: VoltageSteps + ?Sized> ScaleTableBuilder<'a, S> {
    pub fn new(calibration: &'a ChipCalibration, steps: &'a S) -> Self {
        Self {
            calibration,
            steps,
            compensation: ThermalCompensation::default(),
        }
    }

    pub fn with_compensation(mut self, compensation: ThermalCompensation) -> Self {
        self.compensation = compensation;
        self
    }

    /// Compute every cell. Either the whole table is returned or an error;
    /// a failure in any cell discards the rest.
    pub fn build(&self, speedo: Speedo) -> Result<ScaleTable> {
        let max_speedo = self.calibration.max_speedo();
        if speedo.id > max_speedo || self.calibration.speedo_to_vmin.is_empty() {
            error!(speedo_id = speedo.id, max_speedo, "Unsupported speedo");
            return Err(Error::UnsupportedSpeedo {
                id: speedo.id,
                max: max_speedo,
            });
        }

        let coef_table = self.calibration.coef_table(speedo.id);
        let vid_nr = coef_table.len();

        let vmin_uv = self.calibration.vmin(speedo.id)?;
        let vmin = round_voltage(self.steps, vmin_uv)
            .map_err(|e| Error::rounding(format!("vmin {vmin_uv}uV"), e))?;

        let vfloor_uv = self.calibration.vfloor_uv;
        let vfloor = round_voltage(self.steps, vfloor_uv)
            .map_err(|e| Error::rounding(format!("vfloor {vfloor_uv}uV"), e))?;

        debug!(model = %coef_table.model, vid_nr, vmin, vfloor, "Selected CVB table");

        let thermal = ThermalTable::new(self.calibration.thermal_boundaries_c.clone())
            .inspect_err(|e| error!(error = %e, "Thermal table rejected"))?;

        let mut entries = Vec::with_capacity(thermal.zones() * vid_nr);
        for (zone, &zone_floor_c) in thermal.boundaries_c()[..thermal.zones()].iter().enumerate() {
            for step in 0..vid_nr {
                let raw = match self.compensation {
                    ThermalCompensation::Fixed => coef_table.evaluate(step, speedo.value),
                    ThermalCompensation::PerZone => {
                        coef_table.evaluate_at(step, speedo.value, zone_floor_c)
                    }
                };

                let rounded = round_voltage(self.steps, raw).map_err(|e| {
                    Error::rounding(format!("zone {zone} step {step} ({raw}uV)"), e)
                })?;

                let mut uv = rounded.max(vmin);

                // Below the first trip the rail must not drop under vfloor.
                if zone == 0 && uv < vfloor {
                    uv = vfloor;
                }

                debug!(step, zone, vid = step, raw, uv, "Scale table entry");
                entries.push(VoltageEntry { uv, vid: step });
            }
        }

        Ok(ScaleTable {
            model: coef_table.model,
            vid_nr,
            vmin_uv: vmin,
            vfloor_uv: vfloor,
            thermal,
            entries,
        })
    }
}
