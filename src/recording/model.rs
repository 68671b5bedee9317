use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::metadata::QueueItem;

pub(crate) const DEFAULT_OVERRUN_SECONDS: u64 = 3;
pub(crate) const PULL_LEAD_IN_SECONDS: i64 = 3;
pub(crate) const DEATH_REPORT_DELAY_SECONDS: i64 = 3;

/// Opaque reference to a finished recording, handed back by the recorder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactHandle(pub String);

impl ArtifactHandle {
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Recorder failed to start: {0}")]
    Start(String),

    #[error("Recorder failed to stop: {0}")]
    Stop(String),

    #[error("Recorder failed to resume buffering: {0}")]
    Buffer(String),
}

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Processing queue rejected item: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait Recorder: Send + Sync {
    async fn start_recording(&self, offset_seconds: f64) -> Result<(), RecorderError>;

    /// `None` means the recorder stopped but produced nothing.
    async fn stop(&self) -> Result<Option<ArtifactHandle>, RecorderError>;

    async fn start_buffer(&self) -> Result<(), RecorderError>;
}

#[async_trait]
pub trait VideoQueue: Send + Sync {
    async fn queue_video(&self, item: QueueItem) -> Result<(), QueueError>;
}

pub trait GameProcess: Send + Sync {
    fn is_running(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlotState {
    Idle,
    Active,
    Overrunning,
    Draining,
}

/// Phase of the encounter that left the slot most recently. The slot itself
/// can already hold the next encounter while this one finishes.
#[derive(Default)]
pub(crate) struct DrainTracker {
    overrunning: AtomicU64,
    draining: AtomicU64,
}

#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum DrainPhase {
    Overrunning = 1,
    Draining = 2,
    Done = 3,
}

impl DrainTracker {
    pub(crate) fn begin(tracker: &Arc<DrainTracker>, first_phase: DrainPhase) -> DrainGuard {
        let guard = DrainGuard {
            tracker: Arc::clone(tracker),
            phase: AtomicU8::new(0),
        };
        guard.enter(first_phase);
        guard
    }

    pub(crate) fn is_overrunning(&self) -> bool {
        self.overrunning.load(Ordering::SeqCst) > 0
    }

    pub(crate) fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst) > 0
    }

    fn counter(&self, phase: u8) -> Option<&AtomicU64> {
        match phase {
            1 => Some(&self.overrunning),
            2 => Some(&self.draining),
            _ => None,
        }
    }
}

/// Keeps the tracker counters balanced even if the drain task is aborted.
pub(crate) struct DrainGuard {
    tracker: Arc<DrainTracker>,
    phase: AtomicU8,
}

impl DrainGuard {
    pub(crate) fn enter(&self, next_phase: DrainPhase) {
        let previous = self.phase.swap(next_phase as u8, Ordering::SeqCst);
        if let Some(counter) = self.tracker.counter(previous) {
            counter.fetch_sub(1, Ordering::SeqCst);
        }
        if let Some(counter) = self.tracker.counter(next_phase as u8) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        self.enter(DrainPhase::Done);
    }
}
