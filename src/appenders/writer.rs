//! Appender over any `io::Write`

use crate::core::{Appender, Result};
use std::io::{BufWriter, Write};

/// Writes lines to an arbitrary writer (file, socket, pipe)
///
/// Output is buffered; call `flush` (or `Logger::flush`) to push it out.
pub struct WriterAppender<W: Write + Send + Sync> {
    writer: BufWriter<W>,
    name: String,
}

impl<W: Write + Send + Sync> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            name: "writer".to_string(),
        }
    }

    /// Name reported in diagnostics
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<W: Write + Send + Sync> Appender for WriterAppender<W> {
    fn append(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
