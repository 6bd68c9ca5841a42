//! Line-oriented report output shared between the probe and its worker threads.

use std::any::type_name;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use host_capabilities::HostCapabilities;
use parking_lot::Mutex;

/// Destination for report lines, shareable between threads.
///
/// Each line is written and flushed while holding a lock, so lines written concurrently by
/// different workers never interleave. Clones write to the same destination.
#[derive(Clone)]
pub struct ReportSink {
    writer: Arc<Mutex<dyn Write + Send>>,
}

impl ReportSink {
    /// Creates a sink that writes to the standard output of the process.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a sink that writes to an arbitrary destination.
    #[must_use]
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    /// Writes one line, appending the line terminator and flushing.
    pub fn line(&self, args: fmt::Arguments<'_>) -> io::Result<()> {
        let mut writer = self.writer.lock();

        writer.write_fmt(args)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }

    /// Reports the processor count of the host.
    pub fn processor_count(&self, capabilities: &HostCapabilities) -> io::Result<()> {
        self.line(format_args!(
            "Number of processors: {}",
            capabilities.processor_count()
        ))
    }

    /// Reports the maximum memory available to the process.
    pub fn max_memory(&self, capabilities: &HostCapabilities) -> io::Result<()> {
        self.line(format_args!(
            "Max memory: {} bytes",
            capabilities.max_memory_bytes()
        ))
    }

    /// Reports the identity of a worker thread.
    pub fn worker_identity(&self, identity: &str) -> io::Result<()> {
        self.line(format_args!("Thread {identity}"))
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl fmt::Debug for ReportSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(type_name::<Self>()).finish_non_exhaustive()
    }
}

/// An in-memory destination whose contents can be inspected while a sink still holds it.
#[cfg(test)]
#[derive(Clone, Debug, Default)]
pub(crate) struct CapturedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

#[cfg(test)]
impl CapturedOutput {
    pub(crate) fn sink(&self) -> ReportSink {
        ReportSink::new(self.clone())
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.buffer.lock())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
impl Write for CapturedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
