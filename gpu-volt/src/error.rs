//! Error types for table construction and voltage control.

use thiserror::Error;

use crate::Microvolts;
use crate::regulator::RegulatorError;
use crate::thermal::CoolingError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported speedo id {id} (max {max})")]
    UnsupportedSpeedo { id: u32, max: u32 },

    #[error("Thermal table has {zones} zones, limit is {max}")]
    ThermalTableTooLarge { zones: usize, max: usize },

    #[error("Invalid thermal table: {0}")]
    InvalidThermalTable(String),

    #[error("{uv}uV is above the highest supported step ({max_uv}uV)")]
    OutOfRange { uv: Microvolts, max_uv: Microvolts },

    #[error("Regulator reports no usable voltage steps")]
    NoVoltageSteps,

    #[error("Cannot round {what} to a supported voltage step")]
    VoltageRoundingFailed {
        what: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Step {step} outside table of {vid_nr} steps")]
    InvalidStep { step: usize, vid_nr: usize },

    #[error("No table step covers the regulator voltage {uv}uV")]
    NoMatchingStep { uv: Microvolts },

    #[error("Target {uv}uV exceeds the {max_uv}uV ceiling")]
    VoltageAboveLimit { uv: Microvolts, max_uv: Microvolts },

    #[error("Cooling state {state} outside 0..={max_state}")]
    InvalidCoolingState { state: usize, max_state: usize },

    #[error("Regulator write failed")]
    HardwareWriteFailed(#[source] RegulatorError),

    #[error("Regulator read failed")]
    HardwareReadFailed(#[source] RegulatorError),

    #[error("Cooling device registration failed")]
    CoolingRegistrationFailed(#[source] CoolingError),

    #[error("Invalid calibration data: {0}")]
    InvalidCalibration(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn rounding(what: impl Into<String>, source: Error) -> Self {
        Error::VoltageRoundingFailed {
            what: what.into(),
            source: Box::new(source),
        }
    }
}
