//! Logging utilities.
//!
//! The crate itself only talks to the `log` facade. This module offers a
//! ready-made `env_logger` setup for binaries and tests that want to see the
//! driver trace without wiring a backend themselves.

mod init;

pub use init::{init_logging, LoggingConfig};
