//! Logging setup.
//!
//! Library code logs through [`prelude`]; binaries call [`init`] once at
//! startup to install a subscriber honoring `RUST_LOG`.

use tracing_subscriber::EnvFilter;

pub mod prelude {
    pub use tracing::{debug, error, info, trace, warn};
}

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "info";

/// Install a stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
