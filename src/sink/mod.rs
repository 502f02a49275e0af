use std::io::{self, BufWriter, Stdout, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination for formatted lines.
///
/// A sink is moved into the worker thread and only ever touched there, so
/// implementations need `Send` but no internal locking.
pub trait LogSink: Send {
    /// Writes one line. The implementation appends the line terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

impl<S: LogSink + ?Sized> LogSink for Box<S> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Buffered standard output. The default sink.
pub struct ConsoleSink {
    out: BufWriter<Stdout>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            out: BufWriter::new(io::stdout()),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for ConsoleSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Adapts any `Write` into a sink.
pub struct WriterSink<W> {
    inner: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.inner, "{line}")
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// In-memory capture of every line written.
///
/// Clones share the same storage, so a test can hand one clone to the
/// logger and keep another to inspect what was drained.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the captured lines.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
