pub mod dry_run;
pub(crate) mod metadata;
pub(crate) mod model;
pub mod session;

pub use metadata::{EncounterMetadata, MetadataError, QueueItem};
pub use model::{
    ArtifactHandle, GameProcess, QueueError, Recorder, RecorderError, SlotState, VideoQueue,
};
pub use session::{
    DrainOutcome, EncounterController, RecordingStatusEvent, StartOutcome,
};
