//! Appender trait for log output destinations

use super::error::Result;

/// Destination for rendered log lines
///
/// Each call receives one fully rendered entry without a line terminator;
/// the appender adds its own.
pub trait Appender: Send + Sync {
    fn append(&mut self, line: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
