//! Liveness flag shared between an owner and the work it schedules.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cheap clonable cancellation flag.
///
/// Every clone observes the same flag. Once cancelled a token stays cancelled;
/// owners that restart work issue a fresh token instead of resetting one.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the token and all of its clones as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_live(&self) -> bool {
        !self.is_cancelled()
    }
}
