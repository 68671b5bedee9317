use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::line::{LogLine, LogRecord};

/// Best-known game state, kept current from both the raw line stream and
/// the upstream tool's own state events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub in_combat: bool,
    pub zone_id: Option<u32>,
    pub zone_name: Option<String>,
    pub in_content_finder_content: bool,
    pub player_id: Option<String>,
    pub last_update: Option<DateTime<Utc>>,
}

impl GameState {
    pub(crate) fn apply_log_line(&mut self, line: &LogLine) {
        match &line.record {
            LogRecord::ChangePrimaryPlayer(player) => {
                self.player_id = non_empty(&player.player_id);
            }
            LogRecord::InCombat(combat) => {
                self.in_combat = combat.in_game_combat;
                self.last_update = Some(line.timestamp);
            }
            LogRecord::ContentFinderSettings(settings) => {
                self.zone_id = Some(settings.zone_id).filter(|zone_id| *zone_id != 0);
                self.zone_name = non_empty(&settings.zone_name);
                self.in_content_finder_content = settings.in_content_finder_content;
                self.last_update = Some(line.timestamp);
            }
            _ => {}
        }
    }

    pub(crate) fn apply_zone_changed(
        &mut self,
        zone_id: Option<u32>,
        zone_name: Option<&str>,
        at: DateTime<Utc>,
    ) {
        if zone_id.is_some() {
            self.zone_id = zone_id;
        }
        self.zone_name = zone_name.and_then(non_empty);
        self.last_update = Some(at);
    }

    pub(crate) fn apply_combat_changed(&mut self, in_combat: bool, at: DateTime<Utc>) {
        self.in_combat = in_combat;
        self.last_update = Some(at);
    }

    /// Only the first identification is kept.
    pub(crate) fn apply_player_identified(&mut self, player_id: &str) -> bool {
        if self.player_id.is_some() || player_id.is_empty() {
            return false;
        }

        self.player_id = Some(player_id.to_string());
        true
    }
}

pub type SharedGameState = Arc<RwLock<GameState>>;

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::GameState;
    use crate::combat_log::line::{decode_log_line, RawLogLine};
    use chrono::{TimeZone, Utc};

    fn apply(state: &mut GameState, line: &str) {
        let raw = RawLogLine::parse(line).expect("Expected test frame to parse");
        let decoded = decode_log_line(raw, Utc::now());
        state.apply_log_line(&decoded);
    }

    #[test]
    fn tracks_zone_combat_and_player_from_raw_lines() {
        let mut state = GameState::default();

        apply(&mut state, "02|2025-03-14T20:15:11.0000000Z|10FF0001|Alpha Beta|hash");
        apply(
            &mut state,
            "265|2025-03-14T20:15:12.0000000Z|3D2|the Aitiascope|True|0|0|0|0|0|hash",
        );
        apply(&mut state, "260|2025-03-14T20:15:13.0000000Z|1|1|1|1|hash");

        assert_eq!(state.player_id.as_deref(), Some("10FF0001"));
        assert_eq!(state.zone_id, Some(978));
        assert_eq!(state.zone_name.as_deref(), Some("the Aitiascope"));
        assert!(state.in_content_finder_content);
        assert!(state.in_combat);
        assert_eq!(
            state.last_update,
            Some(Utc.with_ymd_and_hms(2025, 3, 14, 20, 15, 13).unwrap())
        );
    }

    #[test]
    fn keeps_first_player_identification() {
        let mut state = GameState::default();

        assert!(state.apply_player_identified("10FF0001"));
        assert!(!state.apply_player_identified("10FF0002"));
        assert!(!state.apply_player_identified(""));
        assert_eq!(state.player_id.as_deref(), Some("10FF0001"));
    }

    #[test]
    fn zone_event_without_id_keeps_known_zone_id() {
        let mut state = GameState::default();
        state.apply_zone_changed(Some(129), Some("Limsa Lominsa"), Utc::now());
        state.apply_zone_changed(None, Some("Gridania"), Utc::now());

        assert_eq!(state.zone_id, Some(129));
        assert_eq!(state.zone_name.as_deref(), Some("Gridania"));
    }
}
