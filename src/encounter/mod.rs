pub mod combatant;
pub mod territory;
pub mod timeline;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::recording::metadata::{EncounterMetadata, MetadataError};
use crate::recording::model::DEFAULT_OVERRUN_SECONDS;

pub use combatant::Combatant;
pub use territory::{lookup_territory, ContentType, Difficulty, RecordingMode, Territory};
pub use timeline::{SegmentType, Timeline, TimelineSegment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EncounterCategory {
    Dungeons,
    Trials,
    Raids,
    AllianceRaids,
    Manual,
}

impl fmt::Display for EncounterCategory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EncounterCategory::Dungeons => "Dungeons",
            EncounterCategory::Trials => "Trials",
            EncounterCategory::Raids => "Raids",
            EncounterCategory::AllianceRaids => "Alliance Raids",
            EncounterCategory::Manual => "Manual",
        };
        formatter.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeathRecord {
    pub actor_id: String,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub relative_seconds: f64,
}

/// Highest-max-HP sample seen so far. Starts at 1/1 so the first real
/// sample always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossHp {
    pub current: u64,
    pub max: u64,
}

impl Default for BossHp {
    fn default() -> Self {
        Self { current: 1, max: 1 }
    }
}

impl BossHp {
    /// Ignores any sample whose max is below the one already recorded.
    pub fn update(&mut self, current: u64, max: u64) -> bool {
        if max < self.max {
            return false;
        }

        self.max = max;
        self.current = current.min(max);
        true
    }

    pub fn remaining_percent(&self) -> u32 {
        if self.max == 0 {
            return 100;
        }

        ((100.0 * self.current as f64) / self.max as f64).round() as u32
    }

    pub fn completion_percent(&self) -> u32 {
        100_u32.saturating_sub(self.remaining_percent())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EncounterDetail {
    DungeonRun {
        timeline: Timeline,
    },
    BossPull {
        pull: u32,
        boss_name: String,
        boss_id: Option<u32>,
        boss_hp: BossHp,
    },
    Manual,
}

/// One recordable activity, from the classifier's start decision until the
/// controller has consumed its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    pub(crate) category: EncounterCategory,
    pub(crate) zone_id: Option<u32>,
    pub(crate) zone_name: String,
    pub(crate) difficulty: Difficulty,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) end_time: Option<DateTime<Utc>>,
    pub(crate) outcome: Option<bool>,
    pub(crate) overrun_seconds: u64,
    pub(crate) roster: BTreeMap<String, Combatant>,
    pub(crate) deaths: Vec<DeathRecord>,
    pub(crate) player_id: Option<String>,
    pub(crate) detail: EncounterDetail,
}

impl Encounter {
    fn new(
        category: EncounterCategory,
        zone_id: Option<u32>,
        zone_name: String,
        difficulty: Difficulty,
        start_time: DateTime<Utc>,
        detail: EncounterDetail,
    ) -> Self {
        Self {
            category,
            zone_id,
            zone_name,
            difficulty,
            start_time,
            end_time: None,
            outcome: None,
            overrun_seconds: DEFAULT_OVERRUN_SECONDS,
            roster: BTreeMap::new(),
            deaths: Vec::new(),
            player_id: None,
            detail,
        }
    }

    /// Whole-instance recording with a Trash segment open at zone entry.
    pub fn dungeon_run(territory: &Territory, start_time: DateTime<Utc>) -> Self {
        let mut timeline = Timeline::new(start_time);
        timeline.open(SegmentType::Trash, start_time, None);

        Self::new(
            territory.category(),
            Some(territory.zone_id),
            territory.name.to_string(),
            territory.difficulty,
            start_time,
            EncounterDetail::DungeonRun { timeline },
        )
    }

    pub fn boss_pull(
        territory: &Territory,
        start_time: DateTime<Utc>,
        pull: u32,
        boss_name: impl Into<String>,
    ) -> Self {
        Self::new(
            territory.category(),
            Some(territory.zone_id),
            territory.name.to_string(),
            territory.difficulty,
            start_time,
            EncounterDetail::BossPull {
                pull,
                boss_name: boss_name.into(),
                boss_id: None,
                boss_hp: BossHp::default(),
            },
        )
    }

    pub fn manual(start_time: DateTime<Utc>, zone_name: Option<String>) -> Self {
        let mut encounter = Self::new(
            EncounterCategory::Manual,
            None,
            zone_name.unwrap_or_else(|| "Manual Recording".to_string()),
            Difficulty::Normal,
            start_time,
            EncounterDetail::Manual,
        );
        encounter.overrun_seconds = 0;
        encounter
    }

    pub fn category(&self) -> EncounterCategory {
        self.category
    }

    pub fn zone_id(&self) -> Option<u32> {
        self.zone_id
    }

    pub fn zone_name(&self) -> &str {
        &self.zone_name
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn outcome(&self) -> Option<bool> {
        self.outcome
    }

    pub fn overrun_seconds(&self) -> u64 {
        self.overrun_seconds
    }

    pub fn set_overrun_seconds(&mut self, overrun_seconds: u64) {
        self.overrun_seconds = overrun_seconds;
    }

    pub fn roster(&self) -> &BTreeMap<String, Combatant> {
        &self.roster
    }

    pub fn deaths(&self) -> &[DeathRecord] {
        &self.deaths
    }

    pub fn detail(&self) -> &EncounterDetail {
        &self.detail
    }

    pub fn is_dungeon_run(&self) -> bool {
        matches!(self.detail, EncounterDetail::DungeonRun { .. })
    }

    pub fn is_manual(&self) -> bool {
        matches!(self.detail, EncounterDetail::Manual)
    }

    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn pull(&self) -> Option<u32> {
        match &self.detail {
            EncounterDetail::BossPull { pull, .. } => Some(*pull),
            _ => None,
        }
    }

    pub fn boss_name(&self) -> Option<&str> {
        match &self.detail {
            EncounterDetail::BossPull { boss_name, .. } => Some(boss_name),
            _ => None,
        }
    }

    pub fn boss_hp(&self) -> Option<BossHp> {
        match &self.detail {
            EncounterDetail::BossPull { boss_hp, .. } => Some(*boss_hp),
            _ => None,
        }
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        match &self.detail {
            EncounterDetail::DungeonRun { timeline } => Some(timeline),
            _ => None,
        }
    }

    pub fn add_combatant(&mut self, combatant: Combatant) {
        match self.roster.get_mut(&combatant.actor_id) {
            Some(existing) => existing.absorb(&combatant),
            None => {
                self.roster.insert(combatant.actor_id.clone(), combatant);
            }
        }
    }

    pub fn set_player_id(&mut self, player_id: &str) {
        if player_id.is_empty() {
            return;
        }

        self.player_id = Some(player_id.to_string());
        if !self.roster.contains_key(player_id) {
            self.roster
                .insert(player_id.to_string(), Combatant::new(player_id));
        }
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.player_id
            .as_deref()
            .and_then(|player_id| self.roster.get(player_id))
    }

    pub fn record_death(&mut self, actor_id: &str, name: &str, at: DateTime<Utc>) {
        let relative_seconds =
            ((at - self.start_time).num_milliseconds() as f64 / 1000.0).max(0.0);

        self.deaths.push(DeathRecord {
            actor_id: actor_id.to_string(),
            name: name.to_string(),
            timestamp: at,
            relative_seconds,
        });
    }

    /// Only boss pulls track HP; other encounters ignore the sample.
    pub fn update_hp(&mut self, current: u64, max: u64) -> bool {
        match &mut self.detail {
            EncounterDetail::BossPull { boss_hp, .. } => boss_hp.update(current, max),
            _ => false,
        }
    }

    pub fn set_boss(&mut self, name: &str, npc_name_id: Option<u32>) {
        if let EncounterDetail::BossPull {
            boss_name, boss_id, ..
        } = &mut self.detail
        {
            *boss_name = name.to_string();
            *boss_id = npc_name_id;
        }
    }

    pub fn open_boss_segment(&mut self, at: DateTime<Utc>, boss_id: Option<u32>) {
        if let EncounterDetail::DungeonRun { timeline } = &mut self.detail {
            timeline.open(SegmentType::BossEncounter, at, boss_id);
        }
    }

    pub fn reopen_trash(&mut self, at: DateTime<Utc>) {
        if let EncounterDetail::DungeonRun { timeline } = &mut self.detail {
            timeline.open(SegmentType::Trash, at, None);
        }
    }

    pub fn end(&mut self, at: DateTime<Utc>, outcome: bool) {
        let end_time = at.max(self.start_time);

        if let EncounterDetail::DungeonRun { timeline } = &mut self.detail {
            timeline.close(end_time);
        }

        self.end_time = Some(end_time);
        self.outcome = Some(outcome);
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.end_time
            .map(|end_time| (end_time - self.start_time).num_seconds())
    }

    pub fn metadata(&self) -> Result<EncounterMetadata, MetadataError> {
        EncounterMetadata::from_encounter(self)
    }

    /// Base name for the finished artifact, before the queue adds anything.
    pub fn file_name_suffix(&self) -> String {
        let result = match self.outcome {
            Some(true) => "Kill",
            _ => "Wipe",
        };

        let body = match &self.detail {
            EncounterDetail::DungeonRun { .. } => {
                format!("{} [{}] ({result})", self.zone_name, self.difficulty)
            }
            EncounterDetail::BossPull {
                pull, boss_name, ..
            } => format!("{boss_name} ({}) [{pull}] ({result})", self.difficulty),
            EncounterDetail::Manual => format!("{} (Manual)", self.zone_name),
        };

        match self.player().and_then(|player| player.display_name.as_deref()) {
            Some(player_name) => format!("{player_name} - {body}"),
            None => body,
        }
    }

    pub fn unique_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.category.to_string().as_bytes());
        hasher.update(self.zone_name.as_bytes());
        hasher.update(self.start_time.timestamp_millis().to_be_bytes());
        for actor_id in self.roster.keys() {
            hasher.update(actor_id.as_bytes());
        }
        if let Some(pull) = self.pull() {
            hasher.update(pull.to_be_bytes());
        }

        hex::encode(hasher.finalize())
    }
}
