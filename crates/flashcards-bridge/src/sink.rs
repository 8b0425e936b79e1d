//! Diagnostic console sink

/// Receives debug text relayed from the core.
pub trait DiagnosticSink: Send + Sync {
    fn debug(&self, message: &str);
}

/// Emits relayed messages as `tracing` debug events under the
/// `flashcards::console` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "flashcards::console", "{}", message);
    }
}
