//! In-memory appender

use crate::core::{Appender, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Keeps rendered lines in memory
///
/// Clones share the same buffer, so one clone can be handed to a logger and
/// another kept to inspect what was written.
///
/// # Example
///
/// ```
/// use tagged_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let logger = Logger::builder()
///     .capture_caller(false)
///     .appender(memory.clone())
///     .build();
///
/// logger.warn("disk almost full");
/// assert_eq!(memory.lines().len(), 1);
/// assert!(memory.contents().contains("[WARN] disk almost full"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// All lines joined with newlines, each terminated
    pub fn contents(&self) -> String {
        self.lines
            .lock()
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
