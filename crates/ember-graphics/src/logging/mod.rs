//! Logging utilities.
//!
//! The device layer reports through the `log` facade; this module only wires
//! up the `env_logger` backend for executables.

mod init;

pub use init::{init_logging, LoggingConfig};
