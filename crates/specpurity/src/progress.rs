//! Progress and completion reporting, plus cooperative cancellation.
//!
//! Both hooks are synchronous and observational only: they never alter the
//! selection outcome. Panics raised by an observer propagate to the caller
//! rather than being swallowed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receiver for selection progress and final results.
pub trait ProgressObserver {
    /// Called once after every projection batch.
    ///
    /// `percent` is the share of projections processed so far; `hits` is the
    /// number of pixels with any positive hit count.
    fn on_progress(&mut self, total_pixels: usize, percent: f32, hits: usize) {
        let _ = (total_pixels, percent, hits);
    }

    /// Called once after thresholding (and reduction, if any) completes.
    fn on_complete(&mut self, total_pixels: usize, candidates: usize, percent: f32) {
        let _ = (total_pixels, candidates, percent);
    }
}

/// Observer that ignores all notifications, for headless use.
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Cooperative cancellation flag, checked once per projection batch.
///
/// Clones share the same flag, so a GUI thread can hold one clone and
/// cancel a selection running elsewhere. A cancelled selection returns
/// [`crate::SelectError::Cancelled`] with no partial results.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a fresh, unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
