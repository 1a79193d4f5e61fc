//! Cooperative cancellation shared by the engine and port implementations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation token wrapping an `AtomicBool`.
///
/// Cloning shares the flag. A [`child`](Self::child) token observes its
/// parent's cancellation but cancelling the child leaves the parent untouched,
/// which lets the orchestrator stop sibling branches on first failure without
/// cancelling the caller's token.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    ancestors: Vec<Arc<AtomicBool>>,
}

impl CancellationToken {
    /// Create a new token (not cancelled).
    pub fn new() -> Self {
        Self::default()
    }

    /// A token cancelled whenever `self` is, that can also be cancelled on its own.
    pub fn child(&self) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(Arc::clone(&self.cancelled));
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            ancestors,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.ancestors.iter().any(|a| a.load(Ordering::Acquire))
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
