use chrono::{DateTime, Utc};
use serde::Serialize;

use super::model::ArtifactHandle;
use crate::encounter::{
    Combatant, DeathRecord, Difficulty, Encounter, EncounterCategory, EncounterDetail,
    TimelineSegment,
};

pub(crate) const ENCOUNTER_METADATA_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Player identity was never resolved for this encounter")]
    PlayerUnresolved,

    #[error("Encounter has not ended yet")]
    NotEnded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterMetadata {
    pub schema_version: u32,
    pub category: EncounterCategory,
    pub encounter_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boss_name: Option<String>,
    pub difficulty: Difficulty,
    pub duration: i64,
    pub result: bool,
    pub overrun: u64,
    pub player: Combatant,
    pub deaths: Vec<DeathRecord>,
    pub combatants: Vec<Combatant>,
    pub start: i64,
    pub started_at: DateTime<Utc>,
    pub unique_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boss_percent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_percent: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TimelineSegment>,
}

impl EncounterMetadata {
    pub(crate) fn from_encounter(encounter: &Encounter) -> Result<Self, MetadataError> {
        let (Some(end_time), Some(result)) = (encounter.end_time, encounter.outcome) else {
            return Err(MetadataError::NotEnded);
        };

        let player = encounter
            .player()
            .cloned()
            .ok_or(MetadataError::PlayerUnresolved)?;

        let mut metadata = Self {
            schema_version: ENCOUNTER_METADATA_SCHEMA_VERSION,
            category: encounter.category,
            encounter_name: encounter.zone_name.clone(),
            zone_id: encounter.zone_id,
            boss_name: None,
            difficulty: encounter.difficulty,
            duration: (end_time - encounter.start_time).num_seconds(),
            result,
            overrun: encounter.overrun_seconds,
            player,
            deaths: encounter.deaths.clone(),
            combatants: encounter.roster.values().cloned().collect(),
            start: encounter.start_time.timestamp_millis(),
            started_at: encounter.start_time,
            unique_hash: encounter.unique_hash(),
            boss_percent: None,
            completion_percent: None,
            pull: None,
            timeline: Vec::new(),
        };

        match &encounter.detail {
            EncounterDetail::DungeonRun { timeline } => {
                metadata.timeline = timeline.segments().to_vec();
            }
            EncounterDetail::BossPull {
                pull,
                boss_name,
                boss_hp,
                ..
            } => {
                metadata.boss_name = Some(boss_name.clone());
                metadata.boss_percent = Some(boss_hp.remaining_percent());
                metadata.completion_percent = Some(boss_hp.completion_percent());
                metadata.pull = Some(*pull);
            }
            EncounterDetail::Manual => {}
        }

        Ok(metadata)
    }
}

/// What the processing queue receives for one finished encounter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub artifact: ArtifactHandle,
    pub filename_suffix: String,
    pub duration_seconds: i64,
    pub metadata: EncounterMetadata,
    pub clip: bool,
}

impl QueueItem {
    pub(crate) fn new(artifact: ArtifactHandle, encounter: &Encounter, metadata: EncounterMetadata) -> Self {
        Self {
            artifact,
            filename_suffix: encounter.file_name_suffix(),
            duration_seconds: metadata.duration,
            metadata,
            clip: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MetadataError;
    use crate::encounter::{lookup_territory, Combatant, Encounter};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 20, 0, 0).unwrap() + Duration::seconds(seconds)
    }

    fn pull_with_player() -> Encounter {
        let territory = lookup_territory(1226).expect("Expected M1 Savage to resolve");
        let mut encounter = Encounter::boss_pull(territory, at(0), 2, "Black Cat");
        encounter.add_combatant(Combatant {
            actor_id: "10FF0001".to_string(),
            display_name: Some("Alpha Beta".to_string()),
            job_id: Some(24),
        });
        encounter.set_player_id("10FF0001");
        encounter
    }

    #[test]
    fn unfinished_encounter_has_no_metadata() {
        let encounter = pull_with_player();

        assert_eq!(encounter.metadata(), Err(MetadataError::NotEnded));
    }

    #[test]
    fn unresolved_player_fails_metadata_extraction() {
        let territory = lookup_territory(1226).expect("Expected M1 Savage to resolve");
        let mut encounter = Encounter::boss_pull(territory, at(0), 1, "Black Cat");
        encounter.end(at(60), false);

        assert_eq!(encounter.metadata(), Err(MetadataError::PlayerUnresolved));
    }

    #[test]
    fn boss_pull_metadata_carries_pull_and_hp() {
        let mut encounter = pull_with_player();
        encounter.update_hp(50, 1000);
        encounter.update_hp(900, 100);
        encounter.end(at(240), false);

        let metadata = encounter.metadata().expect("Expected metadata for ended pull");
        assert_eq!(metadata.duration, 240);
        assert_eq!(metadata.pull, Some(2));
        assert_eq!(metadata.boss_percent, Some(5));
        assert_eq!(metadata.completion_percent, Some(95));
        assert_eq!(metadata.boss_name.as_deref(), Some("Black Cat"));
        assert!(metadata.timeline.is_empty());

        let json = serde_json::to_value(&metadata).expect("Metadata should serialize");
        assert_eq!(json["category"], "Raids");
        assert_eq!(json["difficulty"], "Savage");
        assert_eq!(json["completionPercent"], 95);
        assert!(json.get("timeline").is_none());
    }

    #[test]
    fn dungeon_metadata_includes_timeline() {
        let territory = lookup_territory(978).expect("Expected the Aitiascope to resolve");
        let mut encounter = Encounter::dungeon_run(territory, at(0));
        encounter.set_player_id("10FF0001");
        encounter.open_boss_segment(at(200), Some(11));
        encounter.end(at(500), true);

        let metadata = encounter.metadata().expect("Expected metadata for ended run");
        assert_eq!(metadata.timeline.len(), 2);
        assert_eq!(metadata.pull, None);

        let json = serde_json::to_value(&metadata).expect("Metadata should serialize");
        assert_eq!(json["timeline"][1]["segmentType"], "Boss");
        assert_eq!(json["timeline"][1]["bossId"], 11);
    }
}
