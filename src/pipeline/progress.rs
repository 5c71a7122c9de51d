use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::info;

/// Channel to the UI collaborator: percentage updates, log lines, and
/// the completion signal carrying the delay before the UI may close.
pub trait ProgressSink: Send + Sync {
    fn progress(&self, percent: u8);
    fn log(&self, message: &str);
    fn completed(&self, close_delay: Duration);
}

/// Headless sink that forwards everything to `tracing`.
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn progress(&self, percent: u8) {
        info!("Progress: {percent}%");
    }

    fn log(&self, message: &str) {
        info!("{message}");
    }

    fn completed(&self, close_delay: Duration) {
        info!("Done (close delay {}s).", close_delay.as_secs());
    }
}

/// Cooperative cancellation flag, checked between pages.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
