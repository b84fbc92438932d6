//! Output sink capability

/// Optional shared writing capability for listeners.
///
/// Resolved at listener-construction time, not queried from the dispatcher:
/// deployment modes without a rich sink simply pass `None` and listeners
/// fall back to raw character-stream writes.
pub trait OutputSink: Send + Sync {
    /// Writes `text` to the sink without appending a newline.
    fn write(&self, text: &str);
}
