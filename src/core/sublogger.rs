//! Tag-scoped sub-loggers
//!
//! A [`Sublogger`] is a view over its parent: it owns no configuration, only
//! the tags it appends. Level gating, rendering and the exit action all come
//! from the root logger, so reconfiguring the root is visible through every
//! sub-logger immediately.

use super::caller::CallSite;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::logger::Log;
use super::metadata::Metadata;

/// Logger decorator that appends tags to every entry of its parent
///
/// # Example
///
/// ```
/// use tagged_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let root = Logger::builder()
///     .tags(["A"])
///     .appender(memory.clone())
///     .build();
///
/// let nested = root.sublogger(["B"]).sublogger(["C"]);
/// nested.info("hello");
///
/// assert!(memory.lines()[0].contains("(A,B,C) hello"));
/// assert_eq!(nested.depth(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Sublogger<L: Log> {
    parent: L,
    tags: Vec<String>,
}

impl<L: Log> Sublogger<L> {
    pub fn new<I, S>(parent: L, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parent,
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parent(&self) -> &L {
        &self.parent
    }

    /// Tags this layer appends, not including the parent's
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl<L: Log> Log for Sublogger<L> {
    fn min_level(&self) -> LogLevel {
        self.parent.min_level()
    }

    fn enabled(&self, level: LogLevel) -> bool {
        self.parent.enabled(level)
    }

    fn entry(
        &self,
        level: LogLevel,
        message: &str,
        metadata: Option<Metadata>,
        caller: CallSite,
    ) -> LogEntry {
        let mut entry = self.parent.entry(level, message, metadata, caller);
        entry.push_tags(&self.tags);
        entry
    }

    fn write_entry(&self, entry: &LogEntry) {
        self.parent.write_entry(entry);
    }

    fn exit(&self) {
        self.parent.exit();
    }

    fn depth(&self) -> usize {
        self.parent.depth() + 1
    }
}
