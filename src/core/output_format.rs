//! Output format configuration for log entries
//!
//! Provides the two render formats for log entries:
//! - Pretty: one human-readable line (default)
//! - Json: flat, field-keyed JSON object for log ingestion

use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const ANSI_RESET: &str = "\x1b[0m";

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable single line
    ///
    /// Example: `2025-01-08T10:30:45-12:34 [INFO] [main.rs:12] (api,db) Request processed`
    #[default]
    Pretty,

    /// JSON format for machine processing
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.123456+00:00","level":"INFO","tags":["api"],"message":"Request processed"}`
    Json,
}

impl OutputFormat {
    /// Timestamp layout used when none is configured explicitly
    pub fn default_timestamp_format(&self) -> TimestampFormat {
        match self {
            OutputFormat::Pretty => TimestampFormat::Centiseconds,
            OutputFormat::Json => TimestampFormat::Iso8601Micros,
        }
    }

    /// Render a log entry according to this output format, colorizing if the entry asks for it
    pub fn render(&self, entry: &LogEntry) -> String {
        let output = match self {
            OutputFormat::Pretty => Self::format_pretty(entry),
            OutputFormat::Json => Self::format_json(entry),
        };

        if entry.colorize {
            colorize(&output, entry.level)
        } else {
            output
        }
    }

    /// Format as a single human-readable line
    fn format_pretty(entry: &LogEntry) -> String {
        let mut out = format!("{} [{}] ", entry.timestamp_string(), entry.level.to_str());

        if let Some(caller) = entry.caller {
            out.push_str(&format!("[{}] ", caller));
        }

        if !entry.tags.is_empty() {
            out.push_str(&format!("({}) ", entry.tags.join(",")));
        }

        out.push_str(&entry.leading);
        out.push_str(&entry.message);

        if let Some(ref metadata) = entry.metadata {
            let data = metadata.pretty();
            let starts_with_space = data.chars().next().is_some_and(char::is_whitespace);
            if !entry.message.is_empty() && !data.is_empty() && !starts_with_space {
                out.push(' ');
            }
            out.push_str(&data);
        }

        out.push_str(&entry.trailing);
        out
    }

    /// Format as JSON
    fn format_json(entry: &LogEntry) -> String {
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            "timestamp".to_string(),
            serde_json::Value::String(entry.timestamp_string()),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "tags".to_string(),
            serde_json::Value::Array(
                entry
                    .tags
                    .iter()
                    .cloned()
                    .map(serde_json::Value::String)
                    .collect(),
            ),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        if let Some(ref metadata) = entry.metadata {
            json_obj.insert("metadata".to_string(), metadata.to_json_value());
        }

        if let Some(caller) = entry.caller {
            json_obj.insert("file".to_string(), serde_json::Value::String(caller.to_string()));
        }

        match serde_json::to_string(&serde_json::Value::Object(json_obj)) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("[LOGGER ERROR] JSON encoding failed: {}", e);
                format!(
                    "{{\"level\":{:?},\"message\":{:?}}}",
                    entry.level.to_str(),
                    entry.message
                )
            }
        }
    }
}

/// Wrap every line of `output` in the level's ANSI color and a reset
pub fn colorize(output: &str, level: LogLevel) -> String {
    let start = format!("\x1b[{}m", level.color_code().to_fg_str());
    output
        .split('\n')
        .map(|line| format!("{}{}{}", start, line, ANSI_RESET))
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pretty => write!(f, "pretty"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(OutputFormat::Pretty),
            "json" | "structured" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: '{}'", s)),
        }
    }
}
