//! Sink adapters for throttling summary lines.
//!
//! - [`WriterSink`] writes raw bytes to any `io::Write` (stderr, stdout, a file).
//! - [`TracingSink`] re-emits each line as a `WARN` event under the
//!   [`SUMMARY_TARGET`] target.

use crate::application::ports::Sink;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Target of events emitted by [`TracingSink`].
pub const SUMMARY_TARGET: &str = "tagged_throttle::summary";

/// Sink writing each line to an `io::Write` and flushing it.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Take the writer back.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl WriterSink<io::Stderr> {
    /// Sink writing to standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl WriterSink<io::Stdout> {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl WriterSink<File> {
    /// Sink writing to a file, truncating it first.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        File::create(path).map(Self::new)
    }
}

impl<W: Write + Send> fmt::Debug for WriterSink<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSink").finish_non_exhaustive()
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(buf)?;
        writer.flush()
    }
}

/// Sink forwarding summary lines to the active `tracing` subscriber.
///
/// Summaries are written from inside the filter callback when the pipeline
/// backs an [`AdmissionFilter`](crate::AdmissionFilter). A scoped dispatcher
/// (`tracing::subscriber::with_default`) drops events raised there, so pair
/// this sink with a global subscriber or use a [`WriterSink`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Create a new tracing sink.
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn write(&self, buf: &[u8]) -> io::Result<()> {
        let line = String::from_utf8_lossy(buf);
        tracing::warn!(target: SUMMARY_TARGET, "{}", line.trim_end());
        Ok(())
    }
}
