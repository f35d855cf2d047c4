//! Timestamp formatting utilities
//!
//! Provides the timestamp layouts used by pretty and structured output.
//! Timestamps keep the local UTC offset they were captured with.

use chrono::{DateTime, FixedOffset, Local, Timelike};
use serde::{Deserialize, Serialize};

/// Capture the current local time with its UTC offset
pub fn now() -> DateTime<FixedOffset> {
    Local::now().into()
}

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use tagged_logger::core::TimestampFormat;
/// use chrono::{FixedOffset, TimeZone};
///
/// let ts = FixedOffset::east_opt(0)
///     .unwrap()
///     .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
///     .unwrap();
/// assert_eq!(
///     TimestampFormat::Iso8601Micros.format(&ts),
///     "2025-01-08T10:30:45.000000+00:00"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Compact pretty layout: `2025-01-08T10:30:45-12:34`
    ///
    /// After the seconds come hundredths of a second, then hundredths of a
    /// centisecond. This is the default for pretty output.
    #[default]
    Centiseconds,

    /// Human layout with microseconds and offset: `2025-01-08 10:30:45.123456 +0000`
    Pretty,

    /// ISO 8601 with microseconds and offset: `2025-01-08T10:30:45.123456+00:00`
    ///
    /// Accepted by log ingestion services that take up to six fractional
    /// digits. This is the default for structured output.
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00` (fraction as needed)
    Rfc3339,

    /// Custom strftime format
    ///
    /// # Examples
    ///
    /// ```
    /// use tagged_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a timestamp according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<FixedOffset>) -> String {
        match self {
            TimestampFormat::Centiseconds => {
                let nanos = datetime.nanosecond() % 1_000_000_000;
                let centiseconds = nanos / 10_000_000;
                let remainder = (nanos % 10_000_000) / 100_000;
                format!(
                    "{}-{:02}-{:02}",
                    datetime.format("%Y-%m-%dT%H:%M:%S"),
                    centiseconds,
                    remainder
                )
            }
            TimestampFormat::Pretty => datetime.format("%Y-%m-%d %H:%M:%S%.6f %z").to_string(),
            TimestampFormat::Iso8601Micros => {
                datetime.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
            }
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Get a description of this format
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampFormat::Centiseconds => {
                "Seconds followed by centiseconds and their remainder (2025-01-08T10:30:45-12:34)"
            }
            TimestampFormat::Pretty => "Human readable with offset (2025-01-08 10:30:45.123456 +0000)",
            TimestampFormat::Iso8601Micros => {
                "ISO 8601 with microseconds (2025-01-08T10:30:45.123456+00:00)"
            }
            TimestampFormat::Rfc3339 => "RFC 3339 with timezone (2025-01-08T10:30:45+00:00)",
            TimestampFormat::Custom(_) => "Custom strftime format",
        }
    }
}
