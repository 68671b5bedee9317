pub mod predicates;

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;

use crate::combat_log::line::{
    AddCombatantLine, DeathLine, LogLine, LogRecord, StatusAddLine, UpdateHpLine,
};
use crate::combat_log::state::GameState;
use crate::combat_log::watcher::{PartyMember, WatcherEvent};
use crate::encounter::{
    lookup_territory, Combatant, Encounter, RecordingMode, SegmentType, Territory,
};
use crate::recording::model::{DEATH_REPORT_DELAY_SECONDS, PULL_LEAD_IN_SECONDS};
use crate::recording::session::{DrainOutcome, EncounterController};

pub(crate) const UNKNOWN_BOSS_NAME: &str = "Unknown Boss";

#[derive(Debug, Clone, PartialEq)]
struct BossCandidate {
    actor_id: String,
    name: String,
    npc_name_id: Option<u32>,
    max_hp: u64,
    allow_listed: bool,
}

/// Turns decoded events into start/end decisions for the controller.
///
/// Holds only transient per-zone tracking; the active encounter itself lives
/// in the controller and is mutated through it.
pub struct EncounterClassifier {
    territory: Option<&'static Territory>,
    record_on_combat: bool,
    pull_count: u32,
    in_combat: bool,
    player_id: Option<String>,
    roster: BTreeMap<String, Combatant>,
    boss_candidate: Option<BossCandidate>,
    death_count: usize,
    roster_size_at_start: usize,
    awaiting_live_stream: bool,
}

impl Default for EncounterClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EncounterClassifier {
    pub fn new() -> Self {
        Self {
            territory: None,
            record_on_combat: false,
            pull_count: 0,
            in_combat: false,
            player_id: None,
            roster: BTreeMap::new(),
            boss_candidate: None,
            death_count: 0,
            roster_size_at_start: 0,
            awaiting_live_stream: true,
        }
    }

    pub fn territory(&self) -> Option<&'static Territory> {
        self.territory
    }

    pub fn pull_count(&self) -> u32 {
        self.pull_count
    }

    pub fn is_armed(&self) -> bool {
        self.record_on_combat
    }

    pub fn player_id(&self) -> Option<&str> {
        self.player_id.as_deref()
    }

    /// Replays the cached snapshot so an encounter already in progress when
    /// this process attached is picked up without waiting for an edge.
    pub async fn recover(
        &mut self,
        controller: &mut EncounterController,
        state: &GameState,
        now: DateTime<Utc>,
    ) -> Option<JoinHandle<DrainOutcome>> {
        if let Some(player_id) = state.player_id.as_deref() {
            self.identify_player(controller, player_id, None);
        }

        let Some(zone_id) = state.zone_id else {
            tracing::debug!("No cached zone to recover");
            return None;
        };

        tracing::info!(zone_id, in_combat = state.in_combat, "Recovering from cached game state");
        let drain = self.handle_zone_change(controller, zone_id, now, now).await;

        if state.in_combat {
            self.in_combat = true;
            self.start_recovered_pull(controller, now).await;
        }

        drain
    }

    pub async fn handle_event(
        &mut self,
        controller: &mut EncounterController,
        event: WatcherEvent,
        received_at: DateTime<Utc>,
    ) -> Option<JoinHandle<DrainOutcome>> {
        match event {
            WatcherEvent::Line(line) => {
                self.awaiting_live_stream = false;
                self.handle_line(controller, line, received_at).await
            }
            WatcherEvent::ZoneChanged { zone_id, .. } => {
                let Some(zone_id) = zone_id else {
                    return None;
                };
                self.handle_zone_change(controller, zone_id, received_at, received_at)
                    .await
            }
            WatcherEvent::CombatChanged { in_combat } => {
                if in_combat && self.awaiting_live_stream && !self.in_combat {
                    // The edge happened before we attached.
                    self.in_combat = true;
                    self.start_recovered_pull(controller, received_at).await;
                    return None;
                }
                self.handle_combat_change(controller, in_combat, received_at, received_at)
                    .await
            }
            WatcherEvent::PlayerIdentified { player_id } => {
                self.identify_player(controller, &player_id, None);
                None
            }
            WatcherEvent::PartyChanged { members } => {
                self.apply_party(controller, &members);
                None
            }
            WatcherEvent::IdleTimeout { idle } => {
                let idle_seconds = i64::try_from(idle.as_secs()).unwrap_or(i64::MAX);
                tracing::info!(idle_seconds, "Combat log went idle");
                self.in_combat = false;
                controller.force_end_activity(-idle_seconds, received_at)
            }
            WatcherEvent::ForceStop => controller.force_end_activity(0, received_at),
        }
    }

    async fn handle_line(
        &mut self,
        controller: &mut EncounterController,
        line: LogLine,
        received_at: DateTime<Utc>,
    ) -> Option<JoinHandle<DrainOutcome>> {
        let at = line.timestamp;

        match &line.record {
            LogRecord::ContentFinderSettings(settings) => {
                self.handle_zone_change(controller, settings.zone_id, at, received_at)
                    .await
            }
            LogRecord::InCombat(combat) => {
                self.handle_combat_change(controller, combat.in_game_combat, at, received_at)
                    .await
            }
            LogRecord::ChangePrimaryPlayer(player) => {
                self.identify_player(controller, &player.player_id, Some(&player.player_name));
                None
            }
            LogRecord::AddCombatant(combatant) => {
                self.handle_add_combatant(controller, combatant, at);
                None
            }
            LogRecord::Death(death) => self.handle_death(controller, death, at),
            LogRecord::StatusAdd(status) => {
                self.handle_status(status);
                None
            }
            LogRecord::UpdateHp(update) => {
                self.handle_hp_update(controller, update);
                None
            }
            LogRecord::Chat(chat) => {
                if !predicates::is_dungeon_completion(chat) {
                    return None;
                }

                let is_dungeon_run = controller
                    .active()
                    .is_some_and(|encounter| encounter.is_dungeon_run());
                if !is_dungeon_run {
                    return None;
                }

                tracing::info!(message = %chat.message, "Dungeon completed");
                controller.finish_activity(at, true)
            }
            LogRecord::Unknown => None,
        }
    }

    async fn handle_zone_change(
        &mut self,
        controller: &mut EncounterController,
        zone_id: u32,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<JoinHandle<DrainOutcome>> {
        if self.territory.is_some_and(|territory| territory.zone_id == zone_id) {
            tracing::debug!(zone_id, "Ignoring repeated zone settings for current zone");
            return None;
        }

        // Always end before starting anything new.
        let drain = if controller.is_active() {
            tracing::info!(zone_id, "Zone changed with an active encounter, ending it");
            controller.finish_activity(at, false)
        } else {
            None
        };

        self.reset_zone_tracking();

        let Some(territory) = lookup_territory(zone_id) else {
            tracing::info!(zone_id, "Entered zone that is not recordable");
            return drain;
        };

        self.territory = Some(territory);
        tracing::info!(
            zone_id,
            zone_name = territory.name,
            content_type = ?territory.content_type,
            difficulty = %territory.difficulty,
            "Entered recordable zone"
        );

        match territory.recording_mode() {
            RecordingMode::WholeInstance => {
                let encounter = self.populate(Encounter::dungeon_run(territory, at));
                controller.start_activity(encounter, now).await;
            }
            RecordingMode::PerPull => {
                self.record_on_combat = true;
                if self.in_combat && self.awaiting_live_stream {
                    self.start_recovered_pull(controller, now).await;
                }
            }
        }

        drain
    }

    async fn handle_combat_change(
        &mut self,
        controller: &mut EncounterController,
        in_combat: bool,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Option<JoinHandle<DrainOutcome>> {
        if self.in_combat == in_combat {
            return None;
        }
        self.in_combat = in_combat;

        let Some(territory) = self.territory else {
            return None;
        };

        match (territory.recording_mode(), in_combat) {
            (RecordingMode::WholeInstance, true) => {
                if let Some(candidate) = self.boss_candidate.as_ref().filter(|boss| boss.allow_listed) {
                    if let Some(encounter) = controller.active_mut() {
                        encounter.open_boss_segment(at, candidate.npc_name_id);
                    }
                }
                None
            }
            (RecordingMode::WholeInstance, false) => {
                if let Some(encounter) = controller.active_mut() {
                    let in_boss_segment = encounter
                        .timeline()
                        .and_then(|timeline| timeline.current_type())
                        == Some(SegmentType::BossEncounter);
                    if in_boss_segment {
                        encounter.reopen_trash(at);
                    }
                }
                None
            }
            (RecordingMode::PerPull, true) => {
                if !self.record_on_combat {
                    return None;
                }
                if controller.is_active() {
                    tracing::debug!("Combat resumed within an ongoing pull");
                    return None;
                }

                self.pull_count += 1;
                let boss_name = self
                    .boss_candidate
                    .as_ref()
                    .map(|candidate| candidate.name.clone())
                    .unwrap_or_else(|| UNKNOWN_BOSS_NAME.to_string());
                let start_time = at - Duration::seconds(PULL_LEAD_IN_SECONDS);

                tracing::info!(pull = self.pull_count, boss_name = %boss_name, "Pull started");
                let mut encounter = self.populate(Encounter::boss_pull(
                    territory,
                    start_time,
                    self.pull_count,
                    boss_name,
                ));
                if let Some(candidate) = &self.boss_candidate {
                    encounter.set_boss(&candidate.name, candidate.npc_name_id);
                }
                self.begin_pull_tracking();
                controller.start_activity(encounter, now).await;
                None
            }
            (RecordingMode::PerPull, false) => {
                if territory.ends_on_roster_wipe() {
                    tracing::debug!("Ignoring combat drop for content with combat lulls");
                    return None;
                }
                if !controller.is_active() {
                    return None;
                }

                tracing::info!(pull = self.pull_count, "Combat ended without a boss kill");
                controller.finish_activity(at, false)
            }
        }
    }

    async fn start_recovered_pull(&mut self, controller: &mut EncounterController, now: DateTime<Utc>) {
        let Some(territory) = self.territory else {
            return;
        };
        if territory.recording_mode() != RecordingMode::PerPull
            || !self.record_on_combat
            || controller.is_active()
        {
            return;
        }

        self.pull_count += 1;
        tracing::info!(pull = self.pull_count, "Recovering pull already in progress");
        let encounter = self.populate(Encounter::boss_pull(
            territory,
            now,
            self.pull_count,
            UNKNOWN_BOSS_NAME,
        ));
        self.begin_pull_tracking();
        controller.start_activity(encounter, now).await;
    }

    fn handle_add_combatant(
        &mut self,
        controller: &mut EncounterController,
        combatant: &AddCombatantLine,
        at: DateTime<Utc>,
    ) {
        if combatant.is_player() {
            let player = Combatant::from_add_combatant(combatant);
            if let Some(encounter) = controller.active_mut() {
                encounter.add_combatant(player.clone());
            }
            self.track_roster_member(player);
            return;
        }

        if !predicates::is_boss_candidate(combatant) {
            return;
        }

        let current_is_allow_listed = self
            .boss_candidate
            .as_ref()
            .is_some_and(|candidate| candidate.allow_listed);

        if let Some(boss_name) = predicates::allow_listed_boss(combatant.npc_name_id) {
            if current_is_allow_listed
                && self.boss_candidate.as_ref().map(|candidate| candidate.actor_id.as_str())
                    == Some(combatant.actor_id.as_str())
            {
                return;
            }

            tracing::info!(boss_name, npc_name_id = combatant.npc_name_id, "Allow-listed boss added");
            self.boss_candidate = Some(BossCandidate {
                actor_id: combatant.actor_id.clone(),
                name: boss_name.to_string(),
                npc_name_id: Some(combatant.npc_name_id),
                max_hp: combatant.max_hp,
                allow_listed: true,
            });

            let in_combat = self.in_combat;
            if let Some(encounter) = controller.active_mut() {
                encounter.set_boss(boss_name, Some(combatant.npc_name_id));
                encounter.update_hp(combatant.current_hp, combatant.max_hp);

                let in_boss_segment = encounter
                    .timeline()
                    .and_then(|timeline| timeline.current_type())
                    == Some(SegmentType::BossEncounter);
                if in_combat && encounter.is_dungeon_run() && !in_boss_segment {
                    encounter.open_boss_segment(at, Some(combatant.npc_name_id));
                }
            }
            return;
        }

        if current_is_allow_listed {
            return;
        }

        let candidate_max_hp = self.boss_candidate.as_ref().map(|candidate| candidate.max_hp);
        if !predicates::supersedes_boss_candidate(candidate_max_hp, combatant.max_hp) {
            return;
        }

        self.boss_candidate = Some(BossCandidate {
            actor_id: combatant.actor_id.clone(),
            name: combatant.name.clone(),
            npc_name_id: Some(combatant.npc_name_id).filter(|npc_name_id| *npc_name_id != 0),
            max_hp: combatant.max_hp,
            allow_listed: false,
        });

        if let Some(encounter) = controller.active_mut() {
            if encounter.update_hp(combatant.current_hp, combatant.max_hp) {
                encounter.set_boss(&combatant.name, Some(combatant.npc_name_id));
            }
        }
    }

    fn handle_hp_update(&mut self, controller: &mut EncounterController, update: &UpdateHpLine) {
        if predicates::is_player_actor(&update.target_id) {
            return;
        }

        let Some(encounter) = controller.active_mut() else {
            return;
        };

        if !encounter.update_hp(update.current_hp, update.max_hp) {
            tracing::trace!(target_name = %update.target_name, "Ignoring HP sample below boss max");
            return;
        }

        let current_is_allow_listed = self
            .boss_candidate
            .as_ref()
            .is_some_and(|candidate| candidate.allow_listed);
        let is_current_candidate = self
            .boss_candidate
            .as_ref()
            .is_some_and(|candidate| candidate.actor_id == update.target_id);

        if current_is_allow_listed || is_current_candidate || update.target_name.is_empty() {
            return;
        }

        encounter.set_boss(&update.target_name, None);
        self.boss_candidate = Some(BossCandidate {
            actor_id: update.target_id.clone(),
            name: update.target_name.clone(),
            npc_name_id: None,
            max_hp: update.max_hp,
            allow_listed: false,
        });
    }

    fn handle_death(
        &mut self,
        controller: &mut EncounterController,
        death: &DeathLine,
        at: DateTime<Utc>,
    ) -> Option<JoinHandle<DrainOutcome>> {
        let territory = self.territory?;
        let encounter = controller.active_mut()?;

        let is_roster_member = self.roster.contains_key(&death.target_id)
            || encounter.roster().contains_key(&death.target_id);

        if is_roster_member {
            let reported_at = at - Duration::seconds(DEATH_REPORT_DELAY_SECONDS);
            encounter.record_death(&death.target_id, &death.target_name, reported_at);
            self.death_count += 1;

            let roster_wiped = territory.ends_on_roster_wipe()
                && self.roster_size_at_start > 0
                && self.death_count >= self.roster_size_at_start;
            if roster_wiped {
                tracing::info!(
                    deaths = self.death_count,
                    roster_size = self.roster_size_at_start,
                    "Entire roster dead, ending pull"
                );
                return controller.finish_activity(at, false);
            }
            return None;
        }

        let is_boss = self
            .boss_candidate
            .as_ref()
            .is_some_and(|candidate| candidate.actor_id == death.target_id);
        if !is_boss {
            return None;
        }

        self.boss_candidate = None;

        if encounter.is_dungeon_run() {
            tracing::info!(boss_name = %death.target_name, "Dungeon boss defeated");
            encounter.reopen_trash(at);
            return None;
        }

        tracing::info!(boss_name = %death.target_name, pull = self.pull_count, "Boss defeated");
        controller.finish_activity(at, true)
    }

    fn handle_status(&mut self, status: &StatusAddLine) {
        if !predicates::is_revive(status) || !self.roster.contains_key(&status.target_id) {
            return;
        }

        self.death_count = self.death_count.saturating_sub(1);
        tracing::debug!(
            target_name = %status.target_name,
            deaths = self.death_count,
            "Roster member revived"
        );
    }

    fn identify_player(
        &mut self,
        controller: &mut EncounterController,
        player_id: &str,
        player_name: Option<&str>,
    ) {
        if player_id.is_empty() {
            return;
        }

        self.player_id = Some(player_id.to_string());

        let mut player = Combatant::new(player_id);
        player.display_name = player_name.filter(|name| !name.is_empty()).map(str::to_string);

        if let Some(encounter) = controller.active_mut() {
            encounter.set_player_id(player_id);
            encounter.add_combatant(player.clone());
        }
        self.track_roster_member(player);
    }

    fn apply_party(&mut self, controller: &mut EncounterController, members: &[PartyMember]) {
        for member in members.iter().filter(|member| member.in_party) {
            let combatant = Combatant::from_party_member(member);
            if let Some(encounter) = controller.active_mut() {
                encounter.add_combatant(combatant.clone());
            }
            self.track_roster_member(combatant);
        }
    }

    fn track_roster_member(&mut self, combatant: Combatant) {
        match self.roster.get_mut(&combatant.actor_id) {
            Some(existing) => existing.absorb(&combatant),
            None => {
                self.roster.insert(combatant.actor_id.clone(), combatant);
            }
        }
    }

    fn populate(&self, mut encounter: Encounter) -> Encounter {
        for combatant in self.roster.values() {
            encounter.add_combatant(combatant.clone());
        }
        if let Some(player_id) = &self.player_id {
            encounter.set_player_id(player_id);
        }
        encounter
    }

    fn begin_pull_tracking(&mut self) {
        self.death_count = 0;
        self.roster_size_at_start = self.roster.len();
    }

    fn reset_zone_tracking(&mut self) {
        self.territory = None;
        self.record_on_combat = false;
        self.pull_count = 0;
        self.boss_candidate = None;
        self.death_count = 0;
        self.roster_size_at_start = 0;
        self.roster.retain(|actor_id, _| Some(actor_id) == self.player_id.as_ref());
    }
}
