use std::sync::{Mutex, Once, PoisonError};

use log::LevelFilter;

use super::Verbosity;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "kiln_engine=debug,kiln::buffers=trace"). When neither it nor `RUST_LOG`
/// is set, `verbosity` decides the level.
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub verbosity: Verbosity,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            verbosity: crate::config::DEFAULT_VERBOSITY,
        }
    }
}

static INIT: Once = Once::new();

/// Set once an `env_logger` filter string owns the global level.
static EXPLICIT_FILTER: Mutex<bool> = Mutex::new(false);

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut explicit_filter = EXPLICIT_FILTER.lock().unwrap_or_else(PoisonError::into_inner);
        let mut builder = env_logger::Builder::new();

        let explicit = config.env_filter.or_else(|| std::env::var("RUST_LOG").ok());
        let filtered = explicit.is_some();
        match explicit {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                // Let everything through the backend; the global max level is
                // what `set_verbosity` adjusts later.
                builder.filter_level(LevelFilter::Trace);
            }
        }

        builder.write_style(config.write_style);
        builder.init();

        if filtered {
            *explicit_filter = true;
        } else {
            log::set_max_level(config.verbosity.level_filter());
        }

        log::debug!("logging initialized");
    });
}

/// Changes the global maximum log level.
///
/// Ignored once `init_logging` installed an explicit filter (`env_filter` or
/// `RUST_LOG`); that filter keeps deciding what is logged. Returns whether
/// the level was applied.
pub fn set_verbosity(verbosity: Verbosity) -> bool {
    let explicit_filter = EXPLICIT_FILTER.lock().unwrap_or_else(PoisonError::into_inner);
    if *explicit_filter {
        log::trace!("log verbosity {verbosity} ignored, an explicit filter is installed");
        return false;
    }
    log::set_max_level(verbosity.level_filter());
    log::debug!("log verbosity set to {verbosity}");
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    // Installs the process-wide logger; no other test in this crate does.
    #[test]
    fn explicit_filter_outranks_config_verbosity() {
        init_logging(LoggingConfig {
            env_filter: Some("kiln::buffers=trace".to_string()),
            write_style: env_logger::WriteStyle::Never,
            verbosity: Verbosity::Warning,
        });

        assert!(!set_verbosity(Verbosity::Debug));
        assert_eq!(log::max_level(), LevelFilter::Trace);
        assert!(log::log_enabled!(target: "kiln::buffers", log::Level::Trace));
    }
}
