//! Voltage scaling tables for GPU dynamic voltage/frequency scaling.
//!
//! The chip's speedo calibration selects a CVB (coefficient-based voltage)
//! curve. Evaluating that curve for every frequency step, quantizing to the
//! regulator's discrete steps and clamping against per-bin and per-zone
//! minimums yields a [`ScaleTable`] indexed by `[thermal zone][step]`. At
//! runtime the thermal layer picks the active zone and the driver layer
//! reads and writes voltages through [`VoltControl`].

pub mod config;
pub mod cvb;
pub mod error;
pub mod regulator;
pub mod scale;
pub mod thermal;
pub mod tracing;
pub mod volt;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::{ChipCalibration, Speedo, ThermalCompensation, VoltConfig};
pub use cvb::{CoefTable, CurveModel, CvbCoef};
pub use error::{Error, Result};
pub use regulator::{LinearRange, Regulator, RegulatorError, StepList, VoltageSteps};
pub use scale::{ScaleTable, ScaleTableBuilder, VoltageEntry};
pub use thermal::{CoolingHost, CoolingRegistration, ThermalTable};
pub use volt::{Gm20bVolt, Transition, VoltControl};

/// Microvolts. Signed to match intermediate curve arithmetic.
pub type Microvolts = i32;
