//! The voltage regulator collaborator.
//!
//! The regulator driver itself lives outside this crate. It is reached
//! through [`Regulator`], which also exposes the discrete voltage steps
//! the rail supports so tables can be quantized against them.

mod steps;

use thiserror::Error;

use crate::Microvolts;

pub use steps::{LinearRange, StepList, VoltageSteps, round_voltage};

/// Errors reported by a regulator implementation.
#[derive(Debug, Error)]
pub enum RegulatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Regulator unavailable")]
    Unavailable,
}

/// A voltage rail.
pub trait Regulator: VoltageSteps + Send + Sync {
    /// Current output voltage.
    fn get_voltage(&self) -> Result<Microvolts, RegulatorError>;

    /// Request an output voltage within `[min_uv, max_uv]`.
    ///
    /// Implementations pick the lowest supported voltage in the window.
    fn set_voltage(&self, min_uv: Microvolts, max_uv: Microvolts) -> Result<(), RegulatorError>;
}
