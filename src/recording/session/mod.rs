mod events;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::metadata::QueueItem;
use super::model::{
    DrainGuard, DrainPhase, DrainTracker, GameProcess, Recorder, SlotState, VideoQueue,
};
use crate::encounter::{Encounter, EncounterCategory};
use crate::settings::WatcherSettings;

pub use self::events::RecordingStatusEvent;
use self::events::{
    emit_recording_discarded, emit_recording_queued, emit_recording_started,
    emit_recording_stopped, STATUS_CHANNEL_CAPACITY,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    Disabled,
    AlreadyActive,
    RecorderFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    Queued,
    RecorderFailed,
    EmptyArtifact,
    MetadataUnavailable,
    TooShort,
    QueueFailed,
}

/// Everything a detached drain needs once the encounter has left the slot.
#[derive(Clone)]
struct DrainContext {
    recorder: Arc<dyn Recorder>,
    queue: Arc<dyn VideoQueue>,
    game_process: Arc<dyn GameProcess>,
    min_encounter_duration_seconds: i64,
    status_tx: broadcast::Sender<RecordingStatusEvent>,
}

/// Owns the single active-encounter slot and drives the external recorder.
pub struct EncounterController {
    settings: WatcherSettings,
    active: Option<Encounter>,
    drain_tracker: Arc<DrainTracker>,
    context: DrainContext,
}

impl EncounterController {
    pub fn new(
        settings: &WatcherSettings,
        recorder: Arc<dyn Recorder>,
        queue: Arc<dyn VideoQueue>,
        game_process: Arc<dyn GameProcess>,
    ) -> Self {
        let (status_tx, _status_rx) = broadcast::channel(STATUS_CHANNEL_CAPACITY);

        Self {
            settings: settings.clone(),
            active: None,
            drain_tracker: Arc::new(DrainTracker::default()),
            context: DrainContext {
                recorder,
                queue,
                game_process,
                min_encounter_duration_seconds: settings.min_encounter_duration_seconds as i64,
                status_tx,
            },
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RecordingStatusEvent> {
        self.context.status_tx.subscribe()
    }

    pub fn active(&self) -> Option<&Encounter> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut Encounter> {
        self.active.as_mut()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn slot_state(&self) -> SlotState {
        if self.active.is_some() {
            SlotState::Active
        } else if self.drain_tracker.is_overrunning() {
            SlotState::Overrunning
        } else if self.drain_tracker.is_draining() {
            SlotState::Draining
        } else {
            SlotState::Idle
        }
    }

    pub async fn start_activity(&mut self, encounter: Encounter, now: DateTime<Utc>) -> StartOutcome {
        let category = encounter.category();

        if !self.settings.allows_category(category) {
            tracing::info!(category = %category, "Not recording, category disabled in settings");
            return StartOutcome::Disabled;
        }

        if let Some(active) = &self.active {
            tracing::warn!(
                active_category = %active.category(),
                requested_category = %category,
                "Refusing to start encounter while another is active"
            );
            return StartOutcome::AlreadyActive;
        }

        let mut offset_seconds = (now - encounter.start_time()).num_milliseconds() as f64 / 1000.0;
        if offset_seconds < 0.0 {
            tracing::warn!(offset_seconds, "Encounter starts in the future, clamping backfill to zero");
            offset_seconds = 0.0;
        }

        let encounter_name = encounter.zone_name().to_string();
        tracing::info!(
            category = %category,
            encounter_name = %encounter_name,
            offset_seconds,
            "Starting encounter recording"
        );

        self.active = Some(encounter);

        if let Err(error) = self.context.recorder.start_recording(offset_seconds).await {
            tracing::error!(category = %category, "Failed to start recording: {error}");
            self.active = None;
            return StartOutcome::RecorderFailed;
        }

        emit_recording_started(&self.context.status_tx, category, &encounter_name, offset_seconds);
        StartOutcome::Started
    }

    /// Ends the active encounter at `at` and hands it to `end_activity`.
    pub fn finish_activity(
        &mut self,
        at: DateTime<Utc>,
        outcome: bool,
    ) -> Option<JoinHandle<DrainOutcome>> {
        let Some(encounter) = self.active.as_mut() else {
            tracing::info!("No active encounter to finish");
            return None;
        };

        encounter.end(at, outcome);
        self.end_activity()
    }

    /// Clears the slot immediately; overrun, recorder stop and queueing run
    /// on a detached task so the next encounter can start right away.
    pub fn end_activity(&mut self) -> Option<JoinHandle<DrainOutcome>> {
        let Some(mut encounter) = self.active.take() else {
            tracing::info!("No active encounter to end");
            return None;
        };

        if !encounter.is_ended() {
            tracing::warn!("Ending encounter that was never finalized, treating as a wipe");
            encounter.end(Utc::now(), false);
        }

        tracing::info!(
            category = %encounter.category(),
            outcome = ?encounter.outcome(),
            overrun_seconds = encounter.overrun_seconds(),
            "Ending encounter recording"
        );

        emit_recording_stopped(&self.context.status_tx, encounter.category());

        // Nothing to wait for without an overrun, so the drain starts right away.
        let first_phase = if encounter.overrun_seconds() > 0 {
            DrainPhase::Overrunning
        } else {
            DrainPhase::Draining
        };
        let guard = DrainTracker::begin(&self.drain_tracker, first_phase);
        let context = self.context.clone();
        Some(tokio::spawn(drain_encounter(encounter, context, guard)))
    }

    /// Backdates the end by `time_delta_seconds` and skips the overrun.
    pub fn force_end_activity(
        &mut self,
        time_delta_seconds: i64,
        now: DateTime<Utc>,
    ) -> Option<JoinHandle<DrainOutcome>> {
        let Some(encounter) = self.active.as_mut() else {
            tracing::info!("No active encounter to force end");
            return None;
        };

        tracing::info!(time_delta_seconds, "Force ending encounter");
        encounter.set_overrun_seconds(0);
        encounter.end(now + chrono::Duration::seconds(time_delta_seconds), false);
        self.end_activity()
    }

    /// Discards the active encounter without touching the recorder.
    pub fn drop_activity(&mut self) -> Option<Encounter> {
        let dropped = self.active.take();
        if let Some(encounter) = &dropped {
            tracing::info!(category = %encounter.category(), "Dropping active encounter");
            emit_recording_discarded(&self.context.status_tx, "Encounter dropped");
        }
        dropped
    }

    pub async fn toggle_manual_recording(
        &mut self,
        now: DateTime<Utc>,
        zone_name: Option<String>,
        player_id: Option<&str>,
    ) -> Option<JoinHandle<DrainOutcome>> {
        match self.active.as_ref().map(|active| active.category()) {
            None => {
                let mut encounter = Encounter::manual(now, zone_name);
                if let Some(player_id) = player_id {
                    encounter.set_player_id(player_id);
                }
                self.start_activity(encounter, now).await;
                None
            }
            Some(EncounterCategory::Manual) => self.finish_activity(now, true),
            Some(category) => {
                tracing::info!(
                    category = %category,
                    "Ignoring manual recording toggle while an encounter is active"
                );
                None
            }
        }
    }
}

async fn drain_encounter(
    encounter: Encounter,
    context: DrainContext,
    guard: DrainGuard,
) -> DrainOutcome {
    let overrun_seconds = encounter.overrun_seconds();
    if overrun_seconds > 0 {
        tokio::time::sleep(Duration::from_secs(overrun_seconds)).await;
    }

    guard.enter(DrainPhase::Draining);

    let resume_buffer = context.game_process.is_running();
    let (stop_result, buffer_result) = tokio::join!(context.recorder.stop(), async {
        if resume_buffer {
            Some(context.recorder.start_buffer().await)
        } else {
            None
        }
    });

    if let Some(Err(error)) = buffer_result {
        tracing::warn!("Failed to resume buffering after encounter: {error}");
    }

    let artifact = match stop_result {
        Ok(Some(artifact)) if !artifact.is_empty() => artifact,
        Ok(_) => {
            tracing::warn!("Recorder produced no artifact, discarding encounter");
            emit_recording_discarded(&context.status_tx, "Recorder produced no artifact");
            return DrainOutcome::EmptyArtifact;
        }
        Err(error) => {
            tracing::error!("Failed to stop recording: {error}");
            emit_recording_discarded(&context.status_tx, &error.to_string());
            return DrainOutcome::RecorderFailed;
        }
    };

    let metadata = match encounter.metadata() {
        Ok(metadata) => metadata,
        Err(error) => {
            tracing::warn!(artifact = %artifact.0, "Discarding recording, metadata unavailable: {error}");
            emit_recording_discarded(&context.status_tx, &error.to_string());
            return DrainOutcome::MetadataUnavailable;
        }
    };

    if metadata.category == EncounterCategory::Raids
        && metadata.duration < context.min_encounter_duration_seconds
    {
        tracing::info!(
            duration_seconds = metadata.duration,
            min_duration_seconds = context.min_encounter_duration_seconds,
            "Discarding raid encounter shorter than minimum duration"
        );
        return DrainOutcome::TooShort;
    }

    let item = QueueItem::new(artifact, &encounter, metadata);
    let filename_suffix = item.filename_suffix.clone();

    match context.queue.queue_video(item).await {
        Ok(()) => {
            tracing::info!(filename_suffix = %filename_suffix, "Queued encounter recording");
            emit_recording_queued(&context.status_tx, &filename_suffix);
            DrainOutcome::Queued
        }
        Err(error) => {
            tracing::error!("Failed to queue encounter recording: {error}");
            emit_recording_discarded(&context.status_tx, &error.to_string());
            DrainOutcome::QueueFailed
        }
    }
}
