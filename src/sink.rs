//! Output sinks
//!
//! A sink receives one logical line at a time, without a trailing newline.

use std::io::{self, Write};

/// Destination for formatted report lines
pub trait LineSink {
    /// Emit a single line. The sink is responsible for line termination.
    fn emit(&mut self, line: &str) -> io::Result<()>;
}

impl<S: LineSink + ?Sized> LineSink for &mut S {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        (**self).emit(line)
    }
}

impl<S: LineSink + ?Sized> LineSink for Box<S> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        (**self).emit(line)
    }
}

/// Writes each line followed by `\n` to any `io::Write`
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Unwrap the sink, returning the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{line}")
    }
}

/// Collects lines in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    /// Create an empty sink
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines emitted so far
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take the collected lines, leaving the sink empty
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl LineSink for MemorySink {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }
}
