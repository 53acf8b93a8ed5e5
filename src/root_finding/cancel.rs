//! Cooperative cancellation shared between a caller and running searches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;


/// Cancellation flag checked once per iteration by every search.
///
/// Clones share the same flag, so a clone kept by the caller (or moved to
/// another thread) can stop a search owned elsewhere. Cancellation is
/// sticky: once set, every search holding the token stops at its next step.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
