use chrono::{DateTime, Utc};

pub(crate) const FIELD_SEPARATOR: char = '|';

pub(crate) const TYPE_CHAT_LOG: &str = "00";
pub(crate) const TYPE_CHANGE_PRIMARY_PLAYER: &str = "02";
pub(crate) const TYPE_ADD_COMBATANT: &str = "03";
pub(crate) const TYPE_DEATH: &str = "25";
pub(crate) const TYPE_STATUS_ADD: &str = "26";
pub(crate) const TYPE_UPDATE_HP: &str = "39";
pub(crate) const TYPE_IN_COMBAT: &str = "260";
pub(crate) const TYPE_CONTENT_FINDER_SETTINGS: &str = "265";

/// One `|`-delimited frame as it arrived. Position 0 is the type code,
/// position 1 the timestamp, and the trailing field is a checksum.
#[derive(Debug, Clone, PartialEq)]
pub struct RawLogLine {
    fields: Vec<String>,
}

impl RawLogLine {
    pub fn parse(line: &str) -> Option<Self> {
        let trimmed_line = line.trim_end_matches(['\r', '\n']);
        if trimmed_line.trim().is_empty() {
            return None;
        }

        let fields = trimmed_line
            .split(FIELD_SEPARATOR)
            .map(str::to_string)
            .collect::<Vec<String>>();

        if fields.first().map(|value| value.is_empty()).unwrap_or(true) {
            return None;
        }

        Some(Self { fields })
    }

    pub fn type_code(&self) -> &str {
        self.arg(0)
    }

    /// Field at `index`, or an empty string when the frame is shorter.
    pub fn arg(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|value| value.as_str())
            .unwrap_or("")
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(self.arg(1).trim())
            .ok()
            .map(|value| value.with_timezone(&Utc))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub timestamp: DateTime<Utc>,
    pub raw: RawLogLine,
    pub record: LogRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Chat(ChatLine),
    ChangePrimaryPlayer(PrimaryPlayerLine),
    AddCombatant(AddCombatantLine),
    Death(DeathLine),
    StatusAdd(StatusAddLine),
    UpdateHp(UpdateHpLine),
    InCombat(InCombatLine),
    ContentFinderSettings(ContentFinderSettingsLine),
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatLine {
    pub channel_id: String,
    pub source_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrimaryPlayerLine {
    pub player_id: String,
    pub player_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddCombatantLine {
    pub actor_id: String,
    pub name: String,
    pub job_id: u32,
    pub level: u32,
    pub owner_id: String,
    pub world_id: String,
    pub world: String,
    pub npc_name_id: u32,
    pub npc_base_id: u32,
    pub current_hp: u64,
    pub max_hp: u64,
    pub current_mp: u64,
    pub max_mp: u64,
    pub pos_x: f64,
    pub pos_y: f64,
    pub pos_z: f64,
    pub heading: f64,
}

impl AddCombatantLine {
    pub fn is_player(&self) -> bool {
        self.job_id != 0 && !self.world.is_empty() && self.actor_id.starts_with("10")
    }

    pub fn has_owner(&self) -> bool {
        !self.owner_id.is_empty() && self.owner_id.chars().any(|character| character != '0')
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeathLine {
    pub target_id: String,
    pub target_name: String,
    pub source_id: String,
    pub source_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusAddLine {
    pub status_id: String,
    pub status_name: String,
    pub duration_seconds: f64,
    pub source_id: String,
    pub source_name: String,
    pub target_id: String,
    pub target_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateHpLine {
    pub target_id: String,
    pub target_name: String,
    pub current_hp: u64,
    pub max_hp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InCombatLine {
    pub in_act_combat: bool,
    pub in_game_combat: bool,
    pub is_act_changed: bool,
    pub is_game_changed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentFinderSettingsLine {
    pub zone_id: u32,
    pub zone_name: String,
    pub in_content_finder_content: bool,
    pub unrestricted_party: bool,
    pub minimal_item_level: bool,
    pub silence_echo: bool,
    pub explorer_mode: bool,
    pub level_sync: bool,
}

/// Decodes a raw frame into its typed record. The timestamp falls back to
/// `received_at` when the frame carries an unreadable one.
pub fn decode_log_line(raw: RawLogLine, received_at: DateTime<Utc>) -> LogLine {
    let timestamp = raw.timestamp().unwrap_or(received_at);
    let record = decode_record(&raw);

    LogLine {
        timestamp,
        raw,
        record,
    }
}

fn decode_record(raw: &RawLogLine) -> LogRecord {
    match raw.type_code() {
        TYPE_CHAT_LOG => LogRecord::Chat(ChatLine {
            channel_id: raw.arg(2).to_string(),
            source_name: raw.arg(3).to_string(),
            message: raw.arg(4).to_string(),
        }),
        TYPE_CHANGE_PRIMARY_PLAYER => LogRecord::ChangePrimaryPlayer(PrimaryPlayerLine {
            player_id: raw.arg(2).to_string(),
            player_name: raw.arg(3).to_string(),
        }),
        TYPE_ADD_COMBATANT => LogRecord::AddCombatant(AddCombatantLine {
            actor_id: raw.arg(2).to_string(),
            name: raw.arg(3).to_string(),
            job_id: parse_hex_u32(raw.arg(4)),
            level: parse_decimal_u32(raw.arg(5)),
            owner_id: raw.arg(6).to_string(),
            world_id: raw.arg(7).to_string(),
            world: raw.arg(8).to_string(),
            npc_name_id: parse_decimal_u32(raw.arg(9)),
            npc_base_id: parse_decimal_u32(raw.arg(10)),
            current_hp: parse_decimal_u64(raw.arg(11)),
            max_hp: parse_decimal_u64(raw.arg(12)),
            current_mp: parse_decimal_u64(raw.arg(13)),
            max_mp: parse_decimal_u64(raw.arg(14)),
            // 15 and 16 are legacy TP fields.
            pos_x: parse_float(raw.arg(17)),
            pos_y: parse_float(raw.arg(18)),
            pos_z: parse_float(raw.arg(19)),
            heading: parse_float(raw.arg(20)),
        }),
        TYPE_DEATH => LogRecord::Death(DeathLine {
            target_id: raw.arg(2).to_string(),
            target_name: raw.arg(3).to_string(),
            source_id: raw.arg(4).to_string(),
            source_name: raw.arg(5).to_string(),
        }),
        TYPE_STATUS_ADD => LogRecord::StatusAdd(StatusAddLine {
            status_id: raw.arg(2).to_string(),
            status_name: raw.arg(3).to_string(),
            duration_seconds: parse_float(raw.arg(4)),
            source_id: raw.arg(5).to_string(),
            source_name: raw.arg(6).to_string(),
            target_id: raw.arg(7).to_string(),
            target_name: raw.arg(8).to_string(),
        }),
        TYPE_UPDATE_HP => LogRecord::UpdateHp(UpdateHpLine {
            target_id: raw.arg(2).to_string(),
            target_name: raw.arg(3).to_string(),
            current_hp: parse_decimal_u64(raw.arg(4)),
            max_hp: parse_decimal_u64(raw.arg(5)),
        }),
        TYPE_IN_COMBAT => LogRecord::InCombat(InCombatLine {
            in_act_combat: parse_numeric_flag(raw.arg(2)),
            in_game_combat: parse_numeric_flag(raw.arg(3)),
            is_act_changed: parse_numeric_flag(raw.arg(4)),
            is_game_changed: parse_numeric_flag(raw.arg(5)),
        }),
        TYPE_CONTENT_FINDER_SETTINGS => {
            LogRecord::ContentFinderSettings(ContentFinderSettingsLine {
                zone_id: parse_hex_u32(raw.arg(2)),
                zone_name: raw.arg(3).to_string(),
                // The only word-form flag on the wire.
                in_content_finder_content: parse_word_flag(raw.arg(4)),
                unrestricted_party: parse_numeric_flag(raw.arg(5)),
                minimal_item_level: parse_numeric_flag(raw.arg(6)),
                silence_echo: parse_numeric_flag(raw.arg(7)),
                explorer_mode: parse_numeric_flag(raw.arg(8)),
                level_sync: parse_numeric_flag(raw.arg(9)),
            })
        }
        _ => LogRecord::Unknown,
    }
}

pub(crate) fn parse_hex_u32(value: &str) -> u32 {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).unwrap_or(0)
}

fn parse_decimal_u32(value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or(0)
}

fn parse_decimal_u64(value: &str) -> u64 {
    value.trim().parse::<u64>().unwrap_or(0)
}

fn parse_float(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .unwrap_or(0.0)
}

fn parse_numeric_flag(value: &str) -> bool {
    value.trim() == "1"
}

fn parse_word_flag(value: &str) -> bool {
    value.trim() == "True"
}

#[cfg(test)]
mod tests {
    use super::{decode_log_line, parse_hex_u32, LogRecord, RawLogLine};
    use chrono::{TimeZone, Utc};

    fn decode(line: &str) -> super::LogLine {
        let raw = RawLogLine::parse(line).expect("Expected a non-empty frame to parse");
        decode_log_line(raw, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn decodes_content_finder_settings_with_mixed_flag_encodings() {
        let line = decode(
            "265|2025-03-14T20:15:11.1230000-04:00|3D2|the Aitiascope|True|0|1|0|0|1|abcdef0123456789",
        );

        let LogRecord::ContentFinderSettings(settings) = line.record else {
            panic!("Expected a content finder settings record");
        };
        assert_eq!(settings.zone_id, 0x3D2);
        assert_eq!(settings.zone_name, "the Aitiascope");
        assert!(settings.in_content_finder_content);
        assert!(!settings.unrestricted_party);
        assert!(settings.minimal_item_level);
        assert!(settings.level_sync);
        assert_eq!(
            line.timestamp,
            Utc.with_ymd_and_hms(2025, 3, 15, 0, 15, 11).unwrap()
                + chrono::Duration::milliseconds(123)
        );
    }

    #[test]
    fn word_flag_field_does_not_accept_numeric_form() {
        let line = decode("265|2025-03-14T20:15:11.0000000Z|3D2|the Aitiascope|1|True|0|0|0|0|hash");

        let LogRecord::ContentFinderSettings(settings) = line.record else {
            panic!("Expected a content finder settings record");
        };
        assert!(
            !settings.in_content_finder_content,
            "Content finder flag only accepts True/False"
        );
        assert!(
            !settings.unrestricted_party,
            "Numeric flags only accept 1/0"
        );
    }

    #[test]
    fn decodes_add_combatant_and_classifies_players() {
        let player = decode(
            "03|2025-03-14T20:15:11.0000000Z|10FF0001|Alpha Beta|18|100|0000|4A|Gilgamesh|0|0|95000|95000|10000|10000|0|0|1.5|2.5|0.0|-1.25|hash",
        );
        let LogRecord::AddCombatant(player) = player.record else {
            panic!("Expected an add combatant record");
        };
        assert!(player.is_player());
        assert!(!player.has_owner());
        assert_eq!(player.job_id, 0x18);
        assert_eq!(player.level, 100);
        assert_eq!(player.max_hp, 95_000);
        assert!((player.heading + 1.25).abs() < f64::EPSILON);

        let enemy = decode(
            "03|2025-03-14T20:15:11.0000000Z|40001234|Striking Dummy|00|100|0000|00||541|12345|44000000|44000000|0|0|0|0|0|0|0|0|hash",
        );
        let LogRecord::AddCombatant(enemy) = enemy.record else {
            panic!("Expected an add combatant record");
        };
        assert!(!enemy.is_player());
        assert_eq!(enemy.npc_name_id, 541);
        assert_eq!(enemy.max_hp, 44_000_000);
    }

    #[test]
    fn malformed_fields_default_instead_of_failing_the_line() {
        let line = decode("39|2025-03-14T20:15:11.0000000Z|40001234|Boss|not-a-number");

        let LogRecord::UpdateHp(update) = line.record else {
            panic!("Expected an update hp record");
        };
        assert_eq!(update.current_hp, 0);
        assert_eq!(update.max_hp, 0, "Missing fields should default to zero");
        assert_eq!(update.target_name, "Boss");
    }

    #[test]
    fn unreadable_timestamp_falls_back_to_receive_time() {
        let line = decode("260|garbage|1|1|1|1|hash");
        assert_eq!(line.timestamp, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());

        let LogRecord::InCombat(combat) = line.record else {
            panic!("Expected an in combat record");
        };
        assert!(combat.in_game_combat);
    }

    #[test]
    fn unknown_categories_stay_raw() {
        let line = decode("21|2025-03-14T20:15:11.0000000Z|10FF0001|Alpha|7|Fast Blade|hash");
        assert_eq!(line.record, LogRecord::Unknown);
        assert_eq!(line.raw.arg(5), "Fast Blade");
        assert_eq!(line.raw.arg(42), "");
    }

    #[test]
    fn rejects_empty_frames() {
        assert!(RawLogLine::parse("").is_none());
        assert!(RawLogLine::parse("   \r\n").is_none());
        assert!(RawLogLine::parse("|2025-03-14T20:15:11Z").is_none());
    }

    #[test]
    fn hex_parsing_tolerates_prefix_and_garbage() {
        assert_eq!(parse_hex_u32("0x4A"), 0x4A);
        assert_eq!(parse_hex_u32("4a"), 0x4A);
        assert_eq!(parse_hex_u32("zz"), 0);
    }
}
