//! Process-wide logger
//!
//! Until [`setup`] runs there is no process logger; afterwards there is
//! exactly one. Calling `setup` again reconfigures that logger in place, so
//! every handle and sub-logger obtained earlier sees the new settings.
//! Code that can receive a [`Logger`] handle explicitly should prefer that.

use super::config::LoggerConfig;
use super::log_level::LogLevel;
use super::logger::Logger;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// Configure the process logger, creating it on first use.
///
/// Caller capture is decided by the first call and kept afterwards.
pub fn setup(config: LoggerConfig) -> Logger {
    let mut pending = Some(config);
    let logger = GLOBAL.get_or_init(|| Logger::from_config(pending.take().unwrap_or_default()));

    if let Some(config) = pending {
        logger.configure(config);
    }
    logger.clone()
}

/// The process logger, if [`setup`] has run
pub fn logger() -> Option<Logger> {
    GLOBAL.get().cloned()
}

pub fn is_configured() -> bool {
    GLOBAL.get().is_some()
}

/// Colorized pretty output for local development
pub fn setup_local(min_level: LogLevel) -> Logger {
    setup(LoggerConfig::local(min_level))
}

/// Uncolored structured output for log collectors
pub fn setup_cloud<I, S>(min_level: LogLevel, tags: I) -> Logger
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    setup(LoggerConfig::cloud(min_level, tags))
}
