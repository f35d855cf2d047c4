//! Call-site capture for log entries
//!
//! The location is taken once, at the public entry point, through
//! `#[track_caller]` and handed down explicitly through every wrapping
//! logger. Sub-loggers therefore never need to count stack frames.

use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Placeholder file name used when a location cannot be resolved
pub const UNKNOWN_FILE: &str = "???";

/// Source location of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    location: Option<&'static Location<'static>>,
}

impl CallSite {
    /// Location of the caller of the enclosing `#[track_caller]` function
    #[track_caller]
    #[inline]
    pub fn caller() -> Self {
        Self {
            location: Some(Location::caller()),
        }
    }

    /// A call site that could not be resolved
    pub const fn unknown() -> Self {
        Self { location: None }
    }

    /// Final path component of the source file, or `???`
    pub fn file(&self) -> &'static str {
        self.location
            .and_then(|loc| Path::new(loc.file()).file_name())
            .and_then(|name| name.to_str())
            .unwrap_or(UNKNOWN_FILE)
    }

    /// Source line, or 0 when unresolved
    pub fn line(&self) -> u32 {
        match self.location {
            Some(loc) if Path::new(loc.file()).file_name().is_some() => loc.line(),
            _ => 0,
        }
    }
}

impl Default for CallSite {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file(), self.line())
    }
}
