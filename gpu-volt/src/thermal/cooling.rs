//! Registration with the host's thermal framework.
//!
//! The framework is an external collaborator. This crate only announces
//! the cooling device and withdraws it again; state changes arrive through
//! [`Gm20bVolt::set_cur_state`](crate::volt::Gm20bVolt::set_cur_state).

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::error::{Error as VoltError, Result};
use crate::tracing::prelude::*;

#[derive(Debug, Error)]
pub enum CoolingError {
    #[error("Cooling device {name} rejected: {reason}")]
    Rejected { name: String, reason: String },

    #[error("Thermal framework unavailable")]
    Unavailable,
}

/// Handle issued by the thermal framework for a registered device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoolingId(pub u64);

/// The host's thermal framework.
pub trait CoolingHost: Send + Sync {
    /// Announce a cooling device with states `0..=max_state`.
    fn register(&self, name: &str, max_state: usize) -> std::result::Result<CoolingId, CoolingError>;

    /// Withdraw a previously registered device.
    fn unregister(&self, id: CoolingId);
}

/// A live cooling-device registration. Unregisters when dropped.
pub struct CoolingRegistration {
    host: Arc<dyn CoolingHost>,
    id: CoolingId,
    name: String,
}

impl CoolingRegistration {
    pub fn register(host: Arc<dyn CoolingHost>, name: &str, max_state: usize) -> Result<Self> {
        let id = host
            .register(name, max_state)
            .map_err(VoltError::CoolingRegistrationFailed)?;

        debug!(name, id = id.0, max_state, "Cooling device registered");

        Ok(Self {
            host,
            id,
            name: name.to_string(),
        })
    }

    pub fn id(&self) -> CoolingId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for CoolingRegistration {
    fn drop(&mut self) {
        self.host.unregister(self.id);
        debug!(name = %self.name, id = self.id.0, "Cooling device unregistered");
    }
}

impl fmt::Debug for CoolingRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoolingRegistration")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
