use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::combat_log::line::{AddCombatantLine, ChatLine, StatusAddLine};

const DUNGEON_COMPLETION_CHANNELS: [&str; 2] = ["0840", "0839"];
const DUNGEON_COMPLETION_PHRASES: [&str; 2] = ["completion time", "has ended"];
const REVIVE_STATUS_ID: &str = "1A2";
const PLAYER_ACTOR_PREFIX: &str = "10";

lazy_static! {
    /// Battle NPC name ids known to be dungeon or trial bosses, where the
    /// highest-HP guess is known to pick the wrong actor.
    static ref BOSS_NAME_IDS: HashMap<u32, &'static str> = HashMap::from([
        (10290, "Livia sas Junius"),
        (10291, "Rhitahtyn sas Arvina"),
        (10292, "Amon the Undying"),
        (12823, "Prime Punutiy"),
        (12825, "Drowsie"),
        (12826, "Apollyon"),
        (12853, "Valigarmanda"),
        (13057, "Zoraal Ja"),
        (13822, "Black Cat"),
        (13823, "Honey B. Lovely"),
        (13824, "Brute Bomber"),
        (13825, "Wicked Thunder"),
    ]);
}

/// Clean dungeon completion announced on the system chat channels.
pub fn is_dungeon_completion(chat: &ChatLine) -> bool {
    if !DUNGEON_COMPLETION_CHANNELS.contains(&chat.channel_id.as_str()) {
        return false;
    }

    let message = chat.message.to_lowercase();
    DUNGEON_COMPLETION_PHRASES
        .iter()
        .any(|phrase| message.contains(phrase))
}

pub fn allow_listed_boss(npc_name_id: u32) -> Option<&'static str> {
    BOSS_NAME_IDS.get(&npc_name_id).copied()
}

pub fn is_player_actor(actor_id: &str) -> bool {
    actor_id.starts_with(PLAYER_ACTOR_PREFIX)
}

pub fn is_revive(status: &StatusAddLine) -> bool {
    status.status_id.eq_ignore_ascii_case(REVIVE_STATUS_ID)
}

/// Enemy actors that may be the boss: not a player, not a pet or summon.
pub fn is_boss_candidate(combatant: &AddCombatantLine) -> bool {
    !combatant.is_player()
        && !is_player_actor(&combatant.actor_id)
        && !combatant.has_owner()
        && combatant.max_hp > 0
}

/// Highest observed max HP wins.
pub fn supersedes_boss_candidate(candidate_max_hp: Option<u64>, sample_max_hp: u64) -> bool {
    match candidate_max_hp {
        Some(candidate_max_hp) => sample_max_hp > candidate_max_hp,
        None => sample_max_hp > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        allow_listed_boss, is_dungeon_completion, is_player_actor, is_revive,
        supersedes_boss_candidate,
    };
    use crate::combat_log::line::{ChatLine, StatusAddLine};

    fn chat(channel_id: &str, message: &str) -> ChatLine {
        ChatLine {
            channel_id: channel_id.to_string(),
            source_name: String::new(),
            message: message.to_string(),
        }
    }

    #[test]
    fn detects_completion_messages_on_system_channels() {
        assert!(is_dungeon_completion(&chat(
            "0840",
            "the Aitiascope completion time: 24:13."
        )));
        assert!(is_dungeon_completion(&chat("0839", "The Aetherfont has ended.")));
        assert!(!is_dungeon_completion(&chat("000A", "completion time soon?")));
        assert!(!is_dungeon_completion(&chat("0840", "You obtain 2 tomestones.")));
    }

    #[test]
    fn revive_is_matched_case_insensitively() {
        let status = StatusAddLine {
            status_id: "1a2".to_string(),
            status_name: "Transcendent".to_string(),
            duration_seconds: 5.0,
            source_id: "10FF0001".to_string(),
            source_name: "Alpha Beta".to_string(),
            target_id: "10FF0002".to_string(),
            target_name: "Gamma Delta".to_string(),
        };

        assert!(is_revive(&status));
    }

    #[test]
    fn highest_max_hp_supersedes() {
        assert!(supersedes_boss_candidate(None, 1000));
        assert!(!supersedes_boss_candidate(None, 0));
        assert!(supersedes_boss_candidate(Some(1000), 5000));
        assert!(!supersedes_boss_candidate(Some(5000), 5000));
        assert!(!supersedes_boss_candidate(Some(5000), 100));
    }

    #[test]
    fn allow_list_and_actor_prefix() {
        assert_eq!(allow_listed_boss(12853), Some("Valigarmanda"));
        assert_eq!(allow_listed_boss(1), None);
        assert!(is_player_actor("10FF0001"));
        assert!(!is_player_actor("40001234"));
    }
}
