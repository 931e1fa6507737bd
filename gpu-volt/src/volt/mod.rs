//! Voltage control on top of a scale table.
//!
//! [`Gm20bVolt`] owns the immutable [`ScaleTable`] and a live copy of the
//! row for the active thermal zone. The clock layer picks voltages through
//! [`VoltControl`]; the thermal layer moves the active zone, either from a
//! temperature reading or by driving the registered cooling device.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Microvolts;
use crate::config::{ChipCalibration, VoltConfig};
use crate::error::{Error, Result};
use crate::regulator::Regulator;
use crate::scale::{ScaleTable, ScaleTableBuilder, VoltageEntry};
use crate::thermal::{CoolingHost, CoolingRegistration};
use crate::tracing::prelude::*;

/// When [`VoltControl::set_by_id`] may touch the rail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Transition {
    /// Always apply.
    #[default]
    Any,
    /// Apply only if the target is below the present voltage.
    Decrease,
    /// Apply only if the target is above the present voltage.
    Increase,
}

impl Transition {
    fn permits(self, current_uv: Microvolts, target_uv: Microvolts) -> bool {
        match self {
            Transition::Any => true,
            Transition::Decrease => target_uv < current_uv,
            Transition::Increase => target_uv > current_uv,
        }
    }
}

/// Voltage operations the clock/DVFS layer drives.
pub trait VoltControl {
    /// Present rail voltage.
    fn get_voltage(&self) -> Result<Microvolts>;

    /// Lowest step of the active row whose voltage covers the present
    /// rail voltage.
    fn current_step(&self) -> Result<usize>;

    /// Program the voltage of `step` in the active row.
    fn set_voltage_step(&self, step: usize) -> Result<()>;

    /// Program the voltage for `id`, subject to `transition`. A write the
    /// transition forbids is skipped and reported as success.
    fn set_by_id(&self, id: usize, transition: Transition) -> Result<()>;
}

/// Active zone and its row, always replaced together.
#[derive(Debug)]
struct LiveTable {
    zone: usize,
    vid: Vec<VoltageEntry>,
}

/// Calibration-table driven voltage control for GM20B-class GPUs.
#[derive(Debug)]
pub struct Gm20bVolt<R> {
    config: VoltConfig,
    regulator: R,
    table: ScaleTable,
    live: RwLock<LiveTable>,
    cooling: Option<CoolingRegistration>,
}

impl<R: Regulator> Gm20bVolt<R> {
    /// Build the scale table, activate the coldest zone and register the
    /// cooling device with `cooling_host`, if one is given.
    ///
    /// Nothing is registered when table construction fails.
    pub fn new(
        config: VoltConfig,
        calibration: &ChipCalibration,
        regulator: R,
        cooling_host: Option<Arc<dyn CoolingHost>>,
    ) -> Result<Self> {
        match regulator.get_voltage() {
            Ok(uv) => info!(uv, "Default rail voltage"),
            Err(e) => warn!(error = %e, "Cannot read default rail voltage"),
        }

        let table = ScaleTableBuilder::new(calibration, &regulator)
            .with_compensation(config.thermal_compensation)
            .build(config.speedo)?;

        info!(
            speedo_id = config.speedo.id,
            speedo_value = config.speedo.value,
            model = %table.model(),
            vid_nr = table.vid_nr(),
            zones = table.zones(),
            "Voltage scale table built"
        );

        let live = LiveTable {
            zone: 0,
            vid: table.row(0).map(<[_]>::to_vec).unwrap_or_default(),
        };

        let cooling = cooling_host
            .map(|host| {
                CoolingRegistration::register(
                    host,
                    &config.cooling_device_name,
                    table.zones() - 1,
                )
            })
            .transpose()?;

        Ok(Self {
            config,
            regulator,
            table,
            live: RwLock::new(live),
            cooling,
        })
    }

    pub fn config(&self) -> &VoltConfig {
        &self.config
    }

    pub fn regulator(&self) -> &R {
        &self.regulator
    }

    pub fn scale_table(&self) -> &ScaleTable {
        &self.table
    }

    pub fn cooling_registration(&self) -> Option<&CoolingRegistration> {
        self.cooling.as_ref()
    }

    pub fn active_zone(&self) -> usize {
        self.live.read().zone
    }

    /// Consistent copy of the active zone and its row.
    pub fn live_table(&self) -> (usize, Vec<VoltageEntry>) {
        let live = self.live.read();
        (live.zone, live.vid.clone())
    }

    pub fn voltage_for_step(&self, step: usize) -> Result<Microvolts> {
        Ok(self.live_entry(step)?.uv)
    }

    /// Activate the zone containing `temp_millideg`. Returns the zone.
    pub fn update_temperature(&self, temp_millideg: i32) -> usize {
        let zone = self.table.thermal().select_zone(temp_millideg);
        if self.switch_zone(zone) {
            info!(temp_millideg, zone, "Thermal zone changed");
        }
        zone
    }

    /// Highest cooling state; one per zone above the coldest.
    pub fn max_state(&self) -> usize {
        self.table.zones() - 1
    }

    pub fn cur_state(&self) -> usize {
        self.active_zone()
    }

    /// Activate zone `state`, as requested by the thermal framework.
    pub fn set_cur_state(&self, state: usize) -> Result<()> {
        let max_state = self.max_state();
        if state > max_state {
            return Err(Error::InvalidCoolingState { state, max_state });
        }
        if self.switch_zone(state) {
            info!(state, "Cooling state changed");
        }
        Ok(())
    }

    /// Withdraw the cooling device. The rail keeps its last voltage.
    pub fn shutdown(mut self) {
        self.cooling.take();
        debug!(zone = self.active_zone(), "Voltage control shut down");
    }

    fn switch_zone(&self, zone: usize) -> bool {
        let Some(row) = self.table.row(zone) else {
            return false;
        };

        let mut live = self.live.write();
        if live.zone == zone {
            return false;
        }
        live.zone = zone;
        live.vid.clear();
        live.vid.extend_from_slice(row);
        true
    }

    fn live_entry(&self, step: usize) -> Result<VoltageEntry> {
        let live = self.live.read();
        live.vid.get(step).copied().ok_or(Error::InvalidStep {
            step,
            vid_nr: live.vid.len(),
        })
    }

    fn read_rail(&self) -> Result<Microvolts> {
        self.regulator
            .get_voltage()
            .map_err(Error::HardwareReadFailed)
    }

    fn apply(&self, entry: VoltageEntry) -> Result<()> {
        let max_uv = self.config.max_uv;
        if entry.uv > max_uv {
            return Err(Error::VoltageAboveLimit {
                uv: entry.uv,
                max_uv,
            });
        }

        debug!(vid = entry.vid, uv = entry.uv, "Setting rail voltage");
        self.regulator
            .set_voltage(entry.uv, max_uv)
            .map_err(Error::HardwareWriteFailed)
    }
}

impl<R: Regulator> VoltControl for Gm20bVolt<R> {
    fn get_voltage(&self) -> Result<Microvolts> {
        self.read_rail()
    }

    fn current_step(&self) -> Result<usize> {
        let uv = self.read_rail()?;
        self.live
            .read()
            .vid
            .iter()
            .position(|entry| entry.uv >= uv)
            .ok_or(Error::NoMatchingStep { uv })
    }

    fn set_voltage_step(&self, step: usize) -> Result<()> {
        let entry = self.live_entry(step)?;
        self.apply(entry)
    }

    fn set_by_id(&self, id: usize, transition: Transition) -> Result<()> {
        let target = self.live_entry(id)?;
        let current_uv = self.read_rail()?;

        debug!(
            current_uv,
            target_uv = target.uv,
            %transition,
            "Voltage change requested"
        );

        if !transition.permits(current_uv, target.uv) {
            return Ok(());
        }
        self.apply(target)
    }
}
