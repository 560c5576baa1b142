//! Progress hooks.

use crate::merger::TensorOutcome;
use crate::summary::MergeSummary;

/// Receives progress events during a merge.
///
/// Purely informational: the merge result never depends on an observer.
/// `on_tensor` is called from worker threads in completion order, not name
/// order.
pub trait MergeObserver: Sync {
    /// Called once before any tensor is processed.
    fn on_start(&self, _total: usize) {}

    /// Called after each tensor of model A has been handled.
    fn on_tensor(&self, _name: &str, _outcome: &TensorOutcome) {}

    /// Called once after the merged model has been assembled.
    fn on_finish(&self, _summary: &MergeSummary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl MergeObserver for NoopObserver {}
