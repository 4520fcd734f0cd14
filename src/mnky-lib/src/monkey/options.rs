use std::time::Duration;

/// Ticks never run more often than this.
pub const MIN_INTERVAL: Duration = Duration::from_millis(100);

pub const DEFAULT_UNDO_LIMIT: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonkeyOptions {
    /// Record undo elements so `stop` can revert every change.
    pub with_undo: bool,
    pub interval: Duration,
    /// Undo tracking is switched off once the stack grows past this.
    pub undo_limit: usize,
}

impl Default for MonkeyOptions {
    fn default() -> Self {
        Self {
            with_undo: true,
            interval: MIN_INTERVAL,
            undo_limit: DEFAULT_UNDO_LIMIT,
        }
    }
}
