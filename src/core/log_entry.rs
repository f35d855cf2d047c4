//! Log entry structure

use super::caller::CallSite;
use super::log_level::LogLevel;
use super::metadata::Metadata;
use super::output_format::OutputFormat;
use super::timestamp::{self, TimestampFormat};
use super::whitespace;
use chrono::{DateTime, FixedOffset};
use std::fmt;

/// One log call, assembled and ready to render.
///
/// The message is stored trimmed; the whitespace that surrounded it is kept
/// in `leading` and `trailing` so pretty output can restore it.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub level: LogLevel,
    pub tags: Vec<String>,
    pub message: String,
    pub leading: String,
    pub trailing: String,
    pub caller: Option<CallSite>,
    pub metadata: Option<Metadata>,
    pub format: OutputFormat,
    pub time_format: TimestampFormat,
    pub colorize: bool,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: &str) -> Self {
        let parts = whitespace::split(message);
        Self {
            timestamp: timestamp::now(),
            level,
            tags: Vec::new(),
            message: parts.core.to_string(),
            leading: parts.leading.to_string(),
            trailing: parts.trailing.to_string(),
            caller: None,
            metadata: None,
            format: OutputFormat::default(),
            time_format: OutputFormat::default().default_timestamp_format(),
            colorize: false,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_caller(mut self, caller: CallSite) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_metadata(mut self, metadata: Option<Metadata>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the render format together with the timestamp layout it uses
    pub fn with_format(mut self, format: OutputFormat, time_format: TimestampFormat) -> Self {
        self.format = format;
        self.time_format = time_format;
        self
    }

    pub fn with_colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    /// Append tags after the ones already present, keeping order and duplicates
    pub fn push_tags(&mut self, tags: &[String]) {
        self.tags.extend_from_slice(tags);
    }

    /// The message exactly as it was logged, whitespace included
    pub fn raw_message(&self) -> String {
        format!("{}{}{}", self.leading, self.message, self.trailing)
    }

    /// Rendered timestamp
    pub fn timestamp_string(&self) -> String {
        self.time_format.format(&self.timestamp)
    }

    /// Render with the entry's own format and color settings
    pub fn render(&self) -> String {
        self.format.render(self)
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
