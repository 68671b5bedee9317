use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use super::metadata::QueueItem;
use super::model::{ArtifactHandle, GameProcess, QueueError, Recorder, RecorderError, VideoQueue};

/// Stands in for the video recorder: logs every command and hands back a
/// synthetic artifact name.
#[derive(Default)]
pub struct DryRunRecorder {
    recordings: AtomicU64,
}

#[async_trait]
impl Recorder for DryRunRecorder {
    async fn start_recording(&self, offset_seconds: f64) -> Result<(), RecorderError> {
        tracing::info!(offset_seconds, "Dry run: start recording");
        Ok(())
    }

    async fn stop(&self) -> Result<Option<ArtifactHandle>, RecorderError> {
        let recording_index = self.recordings.fetch_add(1, Ordering::SeqCst) + 1;
        let artifact = ArtifactHandle(format!("dry-run-{recording_index:04}.mp4"));
        tracing::info!(artifact = %artifact.0, "Dry run: stop recording");
        Ok(Some(artifact))
    }

    async fn start_buffer(&self) -> Result<(), RecorderError> {
        tracing::debug!("Dry run: buffering");
        Ok(())
    }
}

/// Prints each finished item as JSON on stdout.
pub struct JsonQueue;

#[async_trait]
impl VideoQueue for JsonQueue {
    async fn queue_video(&self, item: QueueItem) -> Result<(), QueueError> {
        let json = serde_json::to_string_pretty(&item)
            .map_err(|error| QueueError::Rejected(error.to_string()))?;
        println!("{json}");
        Ok(())
    }
}

/// Without a process poller the game is assumed to be running.
pub struct AssumeGameRunning;

impl GameProcess for AssumeGameRunning {
    fn is_running(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::DryRunRecorder;
    use crate::recording::model::Recorder;

    #[tokio::test]
    async fn dry_run_recorder_numbers_artifacts() {
        let recorder = DryRunRecorder::default();

        let first = recorder.stop().await.expect("Dry run stop never fails");
        let second = recorder.stop().await.expect("Dry run stop never fails");

        assert_eq!(first.map(|artifact| artifact.0).as_deref(), Some("dry-run-0001.mp4"));
        assert_eq!(second.map(|artifact| artifact.0).as_deref(), Some("dry-run-0002.mp4"));
    }
}
