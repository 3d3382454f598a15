use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::{PagecastError, PagecastResult};

/// Lightweight `Send + Sync + Clone` handle for cooperative cancellation.
///
/// A token is owned by one job; cancelling it from any thread makes every
/// subsequent [`checkpoint`](Self::checkpoint) on any clone return
/// `PagecastError::Cancelled`. Stages poll checkpoints at their natural
/// boundaries (per frame, per PCM block, per subprocess wait tick).
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; safe from any thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return `Cancelled` naming the interrupted stage once cancel was requested.
    pub fn checkpoint(&self, stage: &str) -> PagecastResult<()> {
        if self.is_cancelled() {
            return Err(PagecastError::cancelled(format!(
                "job cancelled during {stage}"
            )));
        }
        Ok(())
    }

    /// `true` when `other` is a clone of this token.
    pub fn same_job(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/cancel.rs"]
mod tests;
