use crate::scorer::ScoreBreakdown;
use crate::track::Track;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::SyncSender;
use std::sync::Arc;

/// Snapshot of the all-time best, scored under the configuration current at
/// the time of sending.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub generation: usize,
    pub score: f64,
    pub ordering: Vec<Track>,
    pub breakdown: ScoreBreakdown,
    pub generations_per_sec: f64,
    /// Caller-supplied run identifier; events from a superseded run can be dropped.
    pub epoch: u64,
}

/// Best-effort receiver of progress events. Implementations must not block
/// the search loop.
pub trait ProgressSink {
    fn emit(&self, event: ProgressEvent);
}

/// Drops the event when the channel is full or disconnected.
impl ProgressSink for SyncSender<ProgressEvent> {
    fn emit(&self, event: ProgressEvent) {
        let _ = self.try_send(event);
    }
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent),
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Cooperative cancellation flag, checked once per generation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
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
