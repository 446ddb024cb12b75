//! Logging utilities
//!
//! Thin re-export of the `log` facade so engine modules share one import
//! path. Binaries call [`init`] once at startup; log levels are selected
//! through the `RUST_LOG` environment variable.

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}
