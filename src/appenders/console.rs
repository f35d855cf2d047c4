//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::Write;

/// Writes each line to the process's standard output
///
/// The stdout lock is held for the duration of one line so concurrent
/// entries never interleave mid-line.
pub struct ConsoleAppender {
    _private: (),
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &str) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(line.as_bytes())?;
        handle.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
