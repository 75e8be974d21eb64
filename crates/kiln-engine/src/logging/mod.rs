//! Logging utilities.
//!
//! Logger initialization plus the verbosity scale used by the config file.
//! Everything logs through the `log` facade; `env_logger` is the backend.

mod init;
mod verbosity;

pub use init::{init_logging, set_verbosity, LoggingConfig};
pub use verbosity::Verbosity;
