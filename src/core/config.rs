//! Logger configuration
//!
//! `LoggerConfig` is plain data and can be loaded with serde from whatever
//! configuration source the application uses.

use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

/// Settings shared by a logger and every sub-logger derived from it
///
/// # Example
///
/// ```
/// use tagged_logger::core::{LoggerConfig, LogLevel, OutputFormat};
///
/// let config: LoggerConfig = serde_json::from_str(
///     r#"{"min_level":"Warn","format":"json","tags":["api"]}"#,
/// ).unwrap();
/// assert_eq!(config.min_level, LogLevel::Warn);
/// assert_eq!(config.format, OutputFormat::Json);
/// assert!(config.capture_caller);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Entries below this level are discarded
    pub min_level: LogLevel,
    /// Pretty line or JSON object
    pub format: OutputFormat,
    /// Timestamp layout; `None` picks the default for `format`
    pub time_format: Option<TimestampFormat>,
    /// Wrap output in the level's ANSI color
    pub colorize: bool,
    /// Record `file:line` of the call site
    pub capture_caller: bool,
    /// Tags attached to every entry, before any sub-logger tags
    pub tags: Vec<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            format: OutputFormat::Pretty,
            time_format: None,
            colorize: false,
            capture_caller: true,
            tags: Vec::new(),
        }
    }
}

impl LoggerConfig {
    /// Pretty, colorized output for a developer terminal
    pub fn local(min_level: LogLevel) -> Self {
        Self {
            min_level,
            format: OutputFormat::Pretty,
            time_format: Some(TimestampFormat::Centiseconds),
            colorize: true,
            capture_caller: true,
            tags: Vec::new(),
        }
    }

    /// Uncolored JSON output with microsecond timestamps for log collectors
    pub fn cloud<I, S>(min_level: LogLevel, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_level,
            format: OutputFormat::Json,
            time_format: Some(TimestampFormat::Iso8601Micros),
            colorize: false,
            capture_caller: true,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    /// Timestamp layout in effect
    pub fn effective_time_format(&self) -> TimestampFormat {
        self.time_format
            .clone()
            .unwrap_or_else(|| self.format.default_timestamp_format())
    }

    /// Copy the fields that may change on a live logger.
    ///
    /// `capture_caller` is fixed when the logger is created.
    pub(crate) fn update_from(&mut self, other: LoggerConfig) {
        self.min_level = other.min_level;
        self.format = other.format;
        self.time_format = other.time_format;
        self.colorize = other.colorize;
        self.tags = other.tags;
    }
}
