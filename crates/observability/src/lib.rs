//! Tracing/logging setup shared by processes embedding the gate.

/// Logging configuration (filters, output format).
pub mod logging;

pub use logging::{LOG_FORMAT_VAR, LogFormat};

/// Initialize process-wide tracing/logging.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    logging::init(LogFormat::from_env());
}
