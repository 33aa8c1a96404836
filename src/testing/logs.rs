//! Capture `tracing` output in memory.
//!
//! Pipeline construction runs on the calling thread, so a thread-scoped
//! subscriber sees every diagnostic a join emits while it is being built.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// In-memory log sink.
///
/// ```
/// use ironbeam_join::testing::LogCapture;
///
/// let logs = LogCapture::new();
/// logs.scope(|| tracing::warn!("hello"));
/// assert_eq!(logs.lines_containing("hello"), 1);
/// ```
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` with a subscriber (level `TRACE`, no ANSI colors) that writes
    /// into this capture. Only events from the current thread are recorded.
    pub fn scope<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    /// Everything captured so far.
    #[must_use]
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Number of captured lines containing `needle`.
    #[must_use]
    pub fn lines_containing(&self, needle: &str) -> usize {
        self.contents().lines().filter(|l| l.contains(needle)).count()
    }

    /// Number of captured `WARN` lines.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.lines_containing(" WARN ")
    }
}

/// Writer handed to the subscriber for each event.
pub struct CaptureWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl Write for CaptureWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter {
            buf: Arc::clone(&self.buf),
        }
    }
}
