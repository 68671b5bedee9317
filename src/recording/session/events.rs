use serde::Serialize;
use tokio::sync::broadcast;

use crate::encounter::EncounterCategory;

pub(crate) const STATUS_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum RecordingStatusEvent {
    #[serde(rename_all = "camelCase")]
    RecordingStarted {
        category: EncounterCategory,
        encounter_name: String,
        offset_seconds: f64,
    },
    #[serde(rename_all = "camelCase")]
    RecordingStopped { category: EncounterCategory },
    #[serde(rename_all = "camelCase")]
    RecordingQueued { filename_suffix: String },
    #[serde(rename_all = "camelCase")]
    RecordingDiscarded { reason: String },
}

pub(super) fn emit_recording_started(
    status_tx: &broadcast::Sender<RecordingStatusEvent>,
    category: EncounterCategory,
    encounter_name: &str,
    offset_seconds: f64,
) {
    emit(
        status_tx,
        RecordingStatusEvent::RecordingStarted {
            category,
            encounter_name: encounter_name.to_string(),
            offset_seconds,
        },
    );
}

pub(super) fn emit_recording_stopped(
    status_tx: &broadcast::Sender<RecordingStatusEvent>,
    category: EncounterCategory,
) {
    emit(status_tx, RecordingStatusEvent::RecordingStopped { category });
}

pub(super) fn emit_recording_queued(
    status_tx: &broadcast::Sender<RecordingStatusEvent>,
    filename_suffix: &str,
) {
    emit(
        status_tx,
        RecordingStatusEvent::RecordingQueued {
            filename_suffix: filename_suffix.to_string(),
        },
    );
}

pub(super) fn emit_recording_discarded(
    status_tx: &broadcast::Sender<RecordingStatusEvent>,
    reason: &str,
) {
    emit(
        status_tx,
        RecordingStatusEvent::RecordingDiscarded {
            reason: reason.to_string(),
        },
    );
}

fn emit(status_tx: &broadcast::Sender<RecordingStatusEvent>, event: RecordingStatusEvent) {
    // No subscribers is the normal headless case.
    if let Err(error) = status_tx.send(event) {
        tracing::debug!("No listeners for recording status event: {error}");
    }
}
