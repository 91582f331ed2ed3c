//! # Tether Utilities
//!
//! Logging setup shared by the Tether workspace.
//!
//! `tether-core` only emits `tracing` events; binaries and test suites pick a
//! subscriber from here.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    init_logging, init_logging_to_file, init_logging_with_level, init_test_logging, LogFormat, LogLevel, LoggingError,
};
pub use tracing::{debug, error, info, trace, warn};
