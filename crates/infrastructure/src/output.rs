//! Console output sink

use std::io::Write;

use livecheck_application::ports::OutputSink;

/// Output sink writing to stdout.
///
/// Writes are flushed immediately: progress rendering emits single
/// characters and line buffering would hold them back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Creates a console sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl OutputSink for ConsoleSink {
    fn write(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }
}
