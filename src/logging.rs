//! Per-filter logging context.

/// Default log target for filters built without an explicit context.
pub const DEFAULT_LOG_TARGET: &str = "crawlrule";

/// LogContext names the log target a filter writes its records to.
///
/// Records still go through the `log` facade; the target lets several
/// filters in one process be told apart and filtered independently, e.g.
/// `RUST_LOG=crawl::seeds=debug`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogContext {
    target: String,
}

impl LogContext {
    /// Create a context writing to `target`.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// The log target.
    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for LogContext {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_TARGET)
    }
}
