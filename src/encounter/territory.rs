use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

use super::EncounterCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContentType {
    Dungeon,
    DeepDungeon,
    Trial,
    Raid,
    AllianceRaid,
    VariantDungeon,
    CriterionDungeon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Difficulty {
    Normal,
    Hard,
    Extreme,
    Unreal,
    Savage,
    Ultimate,
    Chaotic,
    Criterion,
    Variant,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
            Difficulty::Unreal => "Unreal",
            Difficulty::Savage => "Savage",
            Difficulty::Ultimate => "Ultimate",
            Difficulty::Chaotic => "Chaotic",
            Difficulty::Criterion => "Criterion",
            Difficulty::Variant => "Variant",
        };
        formatter.write_str(label)
    }
}

/// How an instance maps onto recordings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingMode {
    /// One recording from zone entry to completion.
    WholeInstance,
    /// One recording per boss pull, started on combat.
    PerPull,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Territory {
    pub zone_id: u32,
    pub name: &'static str,
    pub raw_name: &'static str,
    pub content_type: ContentType,
    pub difficulty: Difficulty,
}

impl Territory {
    pub fn recording_mode(&self) -> RecordingMode {
        if matches!(self.difficulty, Difficulty::Ultimate | Difficulty::Chaotic) {
            return RecordingMode::PerPull;
        }

        match self.content_type {
            ContentType::Dungeon | ContentType::DeepDungeon => RecordingMode::WholeInstance,
            ContentType::Trial
            | ContentType::Raid
            | ContentType::AllianceRaid
            | ContentType::VariantDungeon
            | ContentType::CriterionDungeon => RecordingMode::PerPull,
        }
    }

    pub fn category(&self) -> EncounterCategory {
        match self.content_type {
            ContentType::Dungeon
            | ContentType::DeepDungeon
            | ContentType::VariantDungeon
            | ContentType::CriterionDungeon => EncounterCategory::Dungeons,
            ContentType::Trial => EncounterCategory::Trials,
            ContentType::Raid => EncounterCategory::Raids,
            ContentType::AllianceRaid => EncounterCategory::AllianceRaids,
        }
    }

    /// Content with legitimate combat lulls. A combat drop does not end the
    /// pull; boss death or the whole roster dying does.
    pub fn ends_on_roster_wipe(&self) -> bool {
        matches!(
            self.content_type,
            ContentType::VariantDungeon | ContentType::CriterionDungeon | ContentType::AllianceRaid
        ) || self.difficulty == Difficulty::Chaotic
    }
}

const fn territory(
    zone_id: u32,
    name: &'static str,
    raw_name: &'static str,
    content_type: ContentType,
    difficulty: Difficulty,
) -> Territory {
    Territory {
        zone_id,
        name,
        raw_name,
        content_type,
        difficulty,
    }
}

use ContentType::{AllianceRaid, CriterionDungeon, DeepDungeon, Dungeon, Raid, Trial, VariantDungeon};
use Difficulty::{Chaotic, Criterion, Extreme, Hard, Normal, Savage, Ultimate, Variant};

const TERRITORIES: &[Territory] = &[
    // A Realm Reborn dungeons
    territory(1036, "Sastasha", "Sastasha", Dungeon, Normal),
    territory(387, "Sastasha", "Sastasha (Hard)", Dungeon, Hard),
    territory(1037, "the Tam-Tara Deepcroft", "the Tam-Tara Deepcroft", Dungeon, Normal),
    territory(373, "the Tam-Tara Deepcroft", "the Tam-Tara Deepcroft (Hard)", Dungeon, Hard),
    territory(1038, "Copperbell Mines", "Copperbell Mines", Dungeon, Normal),
    territory(349, "Copperbell Mines", "Copperbell Mines (Hard)", Dungeon, Hard),
    territory(162, "Halatali", "Halatali", Dungeon, Normal),
    territory(360, "Halatali", "Halatali (Hard)", Dungeon, Hard),
    territory(1039, "the Thousand Maws of Toto-Rak", "the Thousand Maws of Toto-Rak", Dungeon, Normal),
    territory(1040, "Haukke Manor", "Haukke Manor", Dungeon, Normal),
    territory(350, "Haukke Manor", "Haukke Manor (Hard)", Dungeon, Hard),
    territory(1041, "Brayflox's Longstop", "Brayflox's Longstop", Dungeon, Normal),
    territory(362, "Brayflox's Longstop", "Brayflox's Longstop (Hard)", Dungeon, Hard),
    territory(163, "the Sunken Temple of Qarn", "the Sunken Temple of Qarn", Dungeon, Normal),
    territory(367, "the Sunken Temple of Qarn", "the Sunken Temple of Qarn (Hard)", Dungeon, Hard),
    territory(170, "Cutter's Cry", "Cutter's Cry", Dungeon, Normal),
    territory(1042, "the Stone Vigil", "the Stone Vigil", Dungeon, Normal),
    territory(171, "Dzemael Darkhold", "Dzemael Darkhold", Dungeon, Normal),
    territory(172, "the Aurum Vale", "the Aurum Vale", Dungeon, Normal),
    territory(1043, "Castrum Meridianum", "Castrum Meridianum", Dungeon, Normal),
    territory(1044, "the Praetorium", "the Praetorium", Dungeon, Normal),
    territory(159, "the Wanderer's Palace", "The Wanderer's Palace", Dungeon, Normal),
    territory(188, "the Wanderer's Palace", "The Wanderer's Palace (Hard)", Dungeon, Hard),
    territory(167, "Amdapor Keep", "Amdapor Keep", Dungeon, Normal),
    territory(189, "Amdapor Keep", "Amdapor Keep (Hard)", Dungeon, Hard),
    territory(160, "Pharos Sirius", "Pharos Sirius", Dungeon, Normal),
    territory(510, "Pharos Sirius", "Pharos Sirius (Hard)", Dungeon, Hard),
    territory(363, "the Lost City of Amdapor", "the Lost City of Amdapor", Dungeon, Normal),
    territory(519, "the Lost City of Amdapor", "the Lost City of Amdapor (Hard)", Dungeon, Hard),
    territory(361, "Hullbreaker Isle", "Hullbreaker Isle", Dungeon, Normal),
    territory(557, "Hullbreaker Isle", "Hullbreaker Isle (Hard)", Dungeon, Hard),
    territory(371, "Snowcloak", "Snowcloak", Dungeon, Normal),
    territory(150, "the Keeper of the Lake", "the Keeper of the Lake", Dungeon, Normal),
    // Heavensward dungeons
    territory(434, "the Dusk Vigil", "the Dusk Vigil", Dungeon, Normal),
    territory(441, "Sohm Al", "Sohm Al", Dungeon, Normal),
    territory(617, "Sohm Al", "Sohm Al (Hard)", Dungeon, Hard),
    territory(435, "the Aery", "the Aery", Dungeon, Normal),
    territory(421, "the Vault", "the Vault", Dungeon, Normal),
    territory(416, "the Great Gubal Library", "the Great Gubal Library", Dungeon, Normal),
    territory(578, "the Great Gubal Library", "the Great Gubal Library (Hard)", Dungeon, Hard),
    territory(438, "the Aetherochemical Research Facility", "the Aetherochemical Research Facility", Dungeon, Normal),
    territory(420, "Neverreap", "Neverreap", Dungeon, Normal),
    territory(430, "the Fractal Continuum", "the Fractal Continuum", Dungeon, Normal),
    territory(743, "the Fractal Continuum", "the Fractal Continuum (Hard)", Dungeon, Hard),
    territory(511, "Saint Mocianne's Arboretum", "Saint Mocianne's Arboretum", Dungeon, Normal),
    territory(788, "Saint Mocianne's Arboretum", "Saint Mocianne's Arboretum (Hard)", Dungeon, Hard),
    territory(516, "the Antitower", "the Antitower", Dungeon, Normal),
    territory(555, "Sohr Khai", "Sohr Khai", Dungeon, Normal),
    territory(572, "Xelphatol", "Xelphatol", Dungeon, Normal),
    territory(615, "Baelsar's Wall", "Baelsar's Wall", Dungeon, Normal),
    // Stormblood dungeons
    territory(626, "the Sirensong Sea", "the Sirensong Sea", Dungeon, Normal),
    territory(616, "Shisui of the Violet Tides", "Shisui of the Violet Tides", Dungeon, Normal),
    territory(623, "Bardam's Mettle", "Bardam's Mettle", Dungeon, Normal),
    territory(660, "Doma Castle", "Doma Castle", Dungeon, Normal),
    territory(661, "Castrum Abania", "Castrum Abania", Dungeon, Normal),
    territory(689, "Ala Mhigo", "Ala Mhigo", Dungeon, Normal),
    territory(662, "Kugane Castle", "Kugane Castle", Dungeon, Normal),
    territory(663, "the Temple of the Fist", "the Temple of the Fist", Dungeon, Normal),
    territory(731, "the Drowned City of Skalla", "the Drowned City of Skalla", Dungeon, Normal),
    territory(742, "Hells' Lid", "Hells' Lid", Dungeon, Normal),
    territory(768, "the Swallow's Compass", "The Swallow's Compass", Dungeon, Normal),
    territory(789, "the Burn", "the Burn", Dungeon, Normal),
    territory(793, "the Ghimlyt Dark", "the Ghimlyt Dark", Dungeon, Normal),
    // Shadowbringers dungeons
    territory(837, "Holminster Switch", "Holminster Switch", Dungeon, Normal),
    territory(821, "Dohn Mheg", "Dohn Mheg", Dungeon, Normal),
    territory(823, "the Qitana Ravel", "the Qitana Ravel", Dungeon, Normal),
    territory(836, "Malikah's Well", "Malikah's Well", Dungeon, Normal),
    territory(822, "Mt. Gulg", "Mt. Gulg", Dungeon, Normal),
    territory(838, "Amaurot", "Amaurot", Dungeon, Normal),
    territory(840, "the Twinning", "the Twinning", Dungeon, Normal),
    territory(841, "Akadaemia Anyder", "Akadaemia Anyder", Dungeon, Normal),
    territory(884, "the Grand Cosmos", "the Grand Cosmos", Dungeon, Normal),
    territory(898, "Anamnesis Anyder", "Anamnesis Anyder", Dungeon, Normal),
    territory(916, "the Heroes' Gauntlet", "The Heroes' Gauntlet", Dungeon, Normal),
    territory(933, "Matoya's Relict", "Matoya's Relict", Dungeon, Normal),
    territory(938, "Paglth'an", "Paglth'an", Dungeon, Normal),
    // Endwalker dungeons
    territory(952, "the Tower of Zot", "the Tower of Zot", Dungeon, Normal),
    territory(969, "the Tower of Babil", "the Tower of Babil", Dungeon, Normal),
    territory(970, "Vanaspati", "Vanaspati", Dungeon, Normal),
    territory(973, "the Dead Ends", "the Dead Ends", Dungeon, Normal),
    territory(974, "Ktisis Hyperboreia", "Ktisis Hyperboreia", Dungeon, Normal),
    territory(976, "Smileton", "Smileton", Dungeon, Normal),
    territory(978, "the Aitiascope", "the Aitiascope", Dungeon, Normal),
    territory(986, "the Stigma Dreamscape", "the Stigma Dreamscape", Dungeon, Normal),
    territory(1050, "Alzadaal's Legacy", "Alzadaal's Legacy", Dungeon, Normal),
    territory(1070, "the Fell Court of Troia", "the Fell Court of Troia", Dungeon, Normal),
    territory(1097, "Lapis Manalis", "Lapis Manalis", Dungeon, Normal),
    territory(1126, "the Aetherfont", "the Aetherfont", Dungeon, Normal),
    territory(1164, "the Lunar Subterrane", "the Lunar Subterrane", Dungeon, Normal),
    // Dawntrail dungeons
    territory(1167, "Ihuykatumu", "Ihuykatumu", Dungeon, Normal),
    territory(1193, "Worqor Zormor", "Worqor Zormor", Dungeon, Normal),
    territory(1194, "the Skydeep Cenote", "the Skydeep Cenote", Dungeon, Normal),
    territory(1198, "Vanguard", "Vanguard", Dungeon, Normal),
    territory(1199, "Alexandria", "Alexandria", Dungeon, Normal),
    territory(1203, "Tender Valley", "Tender Valley", Dungeon, Normal),
    territory(1204, "the Strayborough Deadwalk", "the Strayborough Deadwalk", Dungeon, Normal),
    territory(1208, "Origenics", "Origenics", Dungeon, Normal),
    territory(1242, "Yuweyawata Field Station", "Yuweyawata Field Station", Dungeon, Normal),
    territory(1266, "the Underkeep", "the Underkeep", Dungeon, Normal),
    // Deep dungeons
    territory(561, "Palace of the Dead", "the Palace of the Dead (Floors 1-10)", DeepDungeon, Normal),
    territory(562, "Palace of the Dead", "the Palace of the Dead (Floors 11-20)", DeepDungeon, Normal),
    territory(563, "Palace of the Dead", "the Palace of the Dead (Floors 21-30)", DeepDungeon, Normal),
    territory(564, "Palace of the Dead", "the Palace of the Dead (Floors 31-40)", DeepDungeon, Normal),
    territory(565, "Palace of the Dead", "the Palace of the Dead (Floors 41-50)", DeepDungeon, Normal),
    territory(593, "Palace of the Dead", "the Palace of the Dead (Floors 51-60)", DeepDungeon, Normal),
    territory(594, "Palace of the Dead", "the Palace of the Dead (Floors 61-70)", DeepDungeon, Normal),
    territory(595, "Palace of the Dead", "the Palace of the Dead (Floors 71-80)", DeepDungeon, Normal),
    territory(596, "Palace of the Dead", "the Palace of the Dead (Floors 81-90)", DeepDungeon, Normal),
    territory(597, "Palace of the Dead", "the Palace of the Dead (Floors 91-100)", DeepDungeon, Normal),
    territory(598, "Palace of the Dead", "the Palace of the Dead (Floors 101-110)", DeepDungeon, Normal),
    territory(599, "Palace of the Dead", "the Palace of the Dead (Floors 111-120)", DeepDungeon, Normal),
    territory(600, "Palace of the Dead", "the Palace of the Dead (Floors 121-130)", DeepDungeon, Normal),
    territory(601, "Palace of the Dead", "the Palace of the Dead (Floors 131-140)", DeepDungeon, Normal),
    territory(602, "Palace of the Dead", "the Palace of the Dead (Floors 141-150)", DeepDungeon, Normal),
    territory(603, "Palace of the Dead", "the Palace of the Dead (Floors 151-160)", DeepDungeon, Normal),
    territory(604, "Palace of the Dead", "the Palace of the Dead (Floors 161-170)", DeepDungeon, Normal),
    territory(605, "Palace of the Dead", "the Palace of the Dead (Floors 171-180)", DeepDungeon, Normal),
    territory(606, "Palace of the Dead", "the Palace of the Dead (Floors 181-190)", DeepDungeon, Normal),
    territory(607, "Palace of the Dead", "the Palace of the Dead (Floors 191-200)", DeepDungeon, Normal),
    territory(770, "Heaven-on-High", "Heaven-on-High (Floors 1-10)", DeepDungeon, Normal),
    territory(771, "Heaven-on-High", "Heaven-on-High (Floors 11-20)", DeepDungeon, Normal),
    territory(772, "Heaven-on-High", "Heaven-on-High (Floors 21-30)", DeepDungeon, Normal),
    territory(782, "Heaven-on-High", "Heaven-on-High (Floors 31-40)", DeepDungeon, Normal),
    territory(773, "Heaven-on-High", "Heaven-on-High (Floors 41-50)", DeepDungeon, Normal),
    territory(783, "Heaven-on-High", "Heaven-on-High (Floors 51-60)", DeepDungeon, Normal),
    territory(774, "Heaven-on-High", "Heaven-on-High (Floors 61-70)", DeepDungeon, Normal),
    territory(784, "Heaven-on-High", "Heaven-on-High (Floors 71-80)", DeepDungeon, Normal),
    territory(775, "Heaven-on-High", "Heaven-on-High (Floors 81-90)", DeepDungeon, Normal),
    territory(785, "Heaven-on-High", "Heaven-on-High (Floors 91-100)", DeepDungeon, Normal),
    territory(1099, "Eureka Orthos", "Eureka Orthos (Floors 1-10)", DeepDungeon, Normal),
    territory(1100, "Eureka Orthos", "Eureka Orthos (Floors 11-20)", DeepDungeon, Normal),
    territory(1101, "Eureka Orthos", "Eureka Orthos (Floors 21-30)", DeepDungeon, Normal),
    territory(1102, "Eureka Orthos", "Eureka Orthos (Floors 31-40)", DeepDungeon, Normal),
    territory(1103, "Eureka Orthos", "Eureka Orthos (Floors 41-50)", DeepDungeon, Normal),
    territory(1104, "Eureka Orthos", "Eureka Orthos (Floors 51-60)", DeepDungeon, Normal),
    territory(1105, "Eureka Orthos", "Eureka Orthos (Floors 61-70)", DeepDungeon, Normal),
    territory(1106, "Eureka Orthos", "Eureka Orthos (Floors 71-80)", DeepDungeon, Normal),
    territory(1107, "Eureka Orthos", "Eureka Orthos (Floors 81-90)", DeepDungeon, Normal),
    territory(1108, "Eureka Orthos", "Eureka Orthos (Floors 91-100)", DeepDungeon, Normal),
    territory(1281, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 1-10)", DeepDungeon, Normal),
    territory(1282, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 11-20)", DeepDungeon, Normal),
    territory(1283, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 21-30)", DeepDungeon, Normal),
    territory(1284, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 31-40)", DeepDungeon, Normal),
    territory(1285, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 41-50)", DeepDungeon, Normal),
    territory(1286, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 51-60)", DeepDungeon, Normal),
    territory(1287, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 61-70)", DeepDungeon, Normal),
    territory(1288, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 71-80)", DeepDungeon, Normal),
    territory(1289, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 81-90)", DeepDungeon, Normal),
    territory(1290, "Pilgrim's Traverse", "Pilgrim's Traverse (Stones 91-100)", DeepDungeon, Normal),
    // Variant and criterion dungeons
    territory(1069, "the Sil'dihn Subterrane", "the Sil'dihn Subterrane", VariantDungeon, Variant),
    territory(1137, "Mount Rokkon", "Mount Rokkon", VariantDungeon, Variant),
    territory(1176, "Aloalo Island", "Aloalo Island", VariantDungeon, Variant),
    territory(1075, "Another Sil'dihn Subterrane", "Another Sil'dihn Subterrane", CriterionDungeon, Criterion),
    territory(1076, "Another Sil'dihn Subterrane", "Another Sil'dihn Subterrane (Savage)", CriterionDungeon, Savage),
    territory(1155, "Another Mount Rokkon", "Another Mount Rokkon", CriterionDungeon, Criterion),
    territory(1156, "Another Mount Rokkon", "Another Mount Rokkon (Savage)", CriterionDungeon, Savage),
    territory(1179, "Another Aloalo Island", "Another Aloalo Island", CriterionDungeon, Criterion),
    territory(1180, "Another Aloalo Island", "Another Aloalo Island (Savage)", CriterionDungeon, Savage),
    // A Realm Reborn trials
    territory(1045, "the Bowl of Embers", "the Bowl of Embers", Trial, Normal),
    territory(292, "the Bowl of Embers", "the Bowl of Embers (Hard)", Trial, Hard),
    territory(295, "the Bowl of Embers", "the Bowl of Embers (Extreme)", Trial, Extreme),
    territory(1046, "the Navel", "the Navel", Trial, Normal),
    territory(293, "the Navel", "the Navel (Hard)", Trial, Hard),
    territory(296, "the Navel", "the Navel (Extreme)", Trial, Extreme),
    territory(1047, "the Howling Eye", "the Howling Eye", Trial, Normal),
    territory(294, "the Howling Eye", "the Howling Eye (Hard)", Trial, Hard),
    territory(297, "the Howling Eye", "the Howling Eye (Extreme)", Trial, Extreme),
    territory(1048, "the Porta Decumana", "the Porta Decumana", Trial, Normal),
    territory(364, "Thornmarch", "Thornmarch (Hard)", Trial, Hard),
    territory(365, "Thornmarch", "Thornmarch (Extreme)", Trial, Extreme),
    territory(368, "A Relic Reborn: The Chimera", "A Relic Reborn: The Chimera", Trial, Normal),
    territory(369, "A Relic Reborn: The Hydra", "A Relic Reborn: The Hydra", Trial, Normal),
    territory(281, "the Whorleater", "the Whorleater (Hard)", Trial, Hard),
    territory(359, "the Whorleater", "the Whorleater (Extreme)", Trial, Extreme),
    territory(366, "Battle on the Big Bridge", "Battle on the Big Bridge", Trial, Normal),
    territory(374, "the Striking Tree", "the Striking Tree (Hard)", Trial, Hard),
    territory(375, "the Striking Tree", "the Striking Tree (Extreme)", Trial, Extreme),
    territory(377, "the Akh Afah Amphitheatre", "the Akh Afah Amphitheatre (Hard)", Trial, Hard),
    territory(378, "the Akh Afah Amphitheatre", "the Akh Afah Amphitheatre (Extreme)", Trial, Extreme),
    territory(142, "the Dragon's Neck", "The Dragon's Neck", Trial, Normal),
    territory(426, "the Chrysalis", "the Chrysalis", Trial, Normal),
    territory(396, "Battle in the Big Keep", "Battle in the Big Keep", Trial, Normal),
    territory(394, "Urth's Fount", "Urth's Fount", Trial, Normal),
    territory(348, "the Minstrel's Ballad: Ultima's Bane", "The Minstrel's Ballad: Ultima's Bane", Trial, Extreme),
    // Heavensward trials
    territory(432, "Thok ast Thok", "Thok ast Thok (Hard)", Trial, Hard),
    territory(446, "Thok ast Thok", "Thok ast Thok (Extreme)", Trial, Extreme),
    territory(436, "the Limitless Blue", "the Limitless Blue (Hard)", Trial, Hard),
    territory(447, "the Limitless Blue", "the Limitless Blue (Extreme)", Trial, Extreme),
    territory(437, "the Singularity Reactor", "the Singularity Reactor", Trial, Normal),
    territory(517, "Containment Bay S1T7", "Containment Bay S1T7", Trial, Normal),
    territory(524, "Containment Bay S1T7", "Containment Bay S1T7 (Extreme)", Trial, Extreme),
    territory(559, "the Final Steps of Faith", "the Final Steps of Faith", Trial, Normal),
    territory(576, "Containment Bay P1T6", "Containment Bay P1T6", Trial, Normal),
    territory(577, "Containment Bay P1T6", "Containment Bay P1T6 (Extreme)", Trial, Extreme),
    territory(637, "Containment Bay Z1T9", "Containment Bay Z1T9", Trial, Normal),
    territory(638, "Containment Bay Z1T9", "Containment Bay Z1T9 (Extreme)", Trial, Extreme),
    territory(448, "the Minstrel's Ballad: Thordan's Reign", "The Minstrel's Ballad: Thordan's Reign", Trial, Extreme),
    territory(566, "the Minstrel's Ballad: Nidhogg's Rage", "The Minstrel's Ballad: Nidhogg's Rage", Trial, Extreme),
    // Stormblood trials
    territory(674, "the Pool of Tribute", "the Pool of Tribute", Trial, Normal),
    territory(677, "the Pool of Tribute", "the Pool of Tribute (Extreme)", Trial, Extreme),
    territory(719, "Emanation", "Emanation", Trial, Normal),
    territory(720, "Emanation", "Emanation (Extreme)", Trial, Extreme),
    territory(679, "the Royal Menagerie", "the Royal Menagerie", Trial, Normal),
    territory(746, "the Jade Stoa", "the Jade Stoa", Trial, Normal),
    territory(758, "the Jade Stoa", "the Jade Stoa (Extreme)", Trial, Extreme),
    territory(778, "Castrum Fluminis", "Castrum Fluminis", Trial, Normal),
    territory(761, "the Great Hunt", "the Great Hunt", Trial, Normal),
    territory(762, "the Great Hunt", "the Great Hunt (Extreme)", Trial, Extreme),
    territory(810, "Hells' Kier", "Hells' Kier", Trial, Normal),
    territory(811, "Hells' Kier", "Hells' Kier (Extreme)", Trial, Extreme),
    territory(824, "the Wreath of Snakes", "the Wreath of Snakes", Trial, Normal),
    territory(825, "the Wreath of Snakes", "the Wreath of Snakes (Extreme)", Trial, Extreme),
    territory(806, "Kugane Ohashi", "Kugane Ohashi", Trial, Extreme),
    territory(730, "the Minstrel's Ballad: Shinryu's Domain", "The Minstrel's Ballad: Shinryu's Domain", Trial, Extreme),
    territory(779, "the Minstrel's Ballad: Tsukuyomi's Pain", "The Minstrel's Ballad: Tsukuyomi's Pain", Trial, Extreme),
    // Shadowbringers trials
    territory(845, "the Dancing Plague", "the Dancing Plague", Trial, Normal),
    territory(858, "the Dancing Plague", "the Dancing Plague (Extreme)", Trial, Extreme),
    territory(846, "the Crown of the Immaculate", "the Crown of the Immaculate", Trial, Normal),
    territory(848, "the Crown of the Immaculate", "the Crown of the Immaculate (Extreme)", Trial, Extreme),
    territory(847, "the Dying Gasp", "the Dying Gasp", Trial, Normal),
    territory(897, "Cinder Drift", "Cinder Drift", Trial, Normal),
    territory(912, "Cinder Drift", "Cinder Drift (Extreme)", Trial, Extreme),
    territory(922, "the Seat of Sacrifice", "the Seat of Sacrifice", Trial, Normal),
    territory(923, "the Seat of Sacrifice", "the Seat of Sacrifice (Extreme)", Trial, Extreme),
    territory(934, "Castrum Marinum", "Castrum Marinum", Trial, Normal),
    territory(935, "Castrum Marinum", "Castrum Marinum (Extreme)", Trial, Extreme),
    territory(950, "the Cloud Deck", "the Cloud Deck", Trial, Normal),
    territory(951, "the Cloud Deck", "the Cloud Deck (Extreme)", Trial, Extreme),
    territory(885, "the Minstrel's Ballad: Hades's Elegy", "The Minstrel's Ballad: Hades's Elegy", Trial, Extreme),
    // Endwalker trials
    territory(992, "the Dark Inside", "the Dark Inside", Trial, Normal),
    territory(993, "the Minstrel's Ballad: Zodiark's Fall", "The Minstrel's Ballad: Zodiark's Fall", Trial, Extreme),
    territory(995, "the Mothercrystal", "the Mothercrystal", Trial, Normal),
    territory(996, "the Minstrel's Ballad: Hydaelyn's Call", "The Minstrel's Ballad: Hydaelyn's Call", Trial, Extreme),
    territory(997, "the Final Day", "the Final Day", Trial, Normal),
    territory(998, "the Minstrel's Ballad: Endsinger's Aria", "The Minstrel's Ballad: Endsinger's Aria", Trial, Extreme),
    territory(1071, "Storm's Crown", "Storm's Crown", Trial, Normal),
    territory(1072, "Storm's Crown", "Storm's Crown (Extreme)", Trial, Extreme),
    territory(1095, "Mount Ordeals", "Mount Ordeals", Trial, Normal),
    territory(1096, "Mount Ordeals", "Mount Ordeals (Extreme)", Trial, Extreme),
    territory(1140, "the Voidcast Dais", "the Voidcast Dais", Trial, Normal),
    territory(1141, "the Voidcast Dais", "the Voidcast Dais (Extreme)", Trial, Extreme),
    territory(1168, "the Abyssal Fracture", "the Abyssal Fracture", Trial, Normal),
    territory(1169, "the Abyssal Fracture", "the Abyssal Fracture (Extreme)", Trial, Extreme),
    territory(1136, "the Gilded Araya", "the Gilded Araya", Trial, Normal),
    // Dawntrail trials
    territory(1195, "Worqor Lar Dor", "Worqor Lar Dor", Trial, Normal),
    territory(1196, "Worqor Lar Dor", "Worqor Lar Dor (Extreme)", Trial, Extreme),
    territory(1200, "Everkeep", "Everkeep", Trial, Normal),
    territory(1201, "Everkeep", "Everkeep (Extreme)", Trial, Extreme),
    // A Realm Reborn raids
    territory(241, "the Binding Coil of Bahamut - Turn 1", "the Binding Coil of Bahamut - Turn 1", Raid, Normal),
    territory(242, "the Binding Coil of Bahamut - Turn 2", "the Binding Coil of Bahamut - Turn 2", Raid, Normal),
    territory(243, "the Binding Coil of Bahamut - Turn 3", "the Binding Coil of Bahamut - Turn 3", Raid, Normal),
    territory(244, "the Binding Coil of Bahamut - Turn 4", "the Binding Coil of Bahamut - Turn 4", Raid, Normal),
    territory(245, "the Binding Coil of Bahamut - Turn 5", "the Binding Coil of Bahamut - Turn 5", Raid, Normal),
    territory(355, "the Second Coil of Bahamut - Turn 1", "the Second Coil of Bahamut - Turn 1", Raid, Normal),
    territory(356, "the Second Coil of Bahamut - Turn 2", "the Second Coil of Bahamut - Turn 2", Raid, Normal),
    territory(357, "the Second Coil of Bahamut - Turn 3", "the Second Coil of Bahamut - Turn 3", Raid, Normal),
    territory(358, "the Second Coil of Bahamut - Turn 4", "the Second Coil of Bahamut - Turn 4", Raid, Normal),
    territory(380, "the Second Coil of Bahamut - Turn 1", "the Second Coil of Bahamut (Savage) - Turn 1", Raid, Savage),
    territory(381, "the Second Coil of Bahamut - Turn 2", "the Second Coil of Bahamut (Savage) - Turn 2", Raid, Savage),
    territory(382, "the Second Coil of Bahamut - Turn 3", "the Second Coil of Bahamut (Savage) - Turn 3", Raid, Savage),
    territory(383, "the Second Coil of Bahamut - Turn 4", "the Second Coil of Bahamut (Savage) - Turn 4", Raid, Savage),
    territory(193, "the Final Coil of Bahamut - Turn 1", "the Final Coil of Bahamut - Turn 1", Raid, Normal),
    territory(194, "the Final Coil of Bahamut - Turn 2", "the Final Coil of Bahamut - Turn 2", Raid, Normal),
    territory(195, "the Final Coil of Bahamut - Turn 3", "the Final Coil of Bahamut - Turn 3", Raid, Normal),
    territory(196, "the Final Coil of Bahamut - Turn 4", "the Final Coil of Bahamut - Turn 4", Raid, Normal),
    // Heavensward raids
    territory(442, "Alexander - The Fist of the Father", "Alexander - The Fist of the Father", Raid, Normal),
    territory(443, "Alexander - The Cuff of the Father", "Alexander - The Cuff of the Father", Raid, Normal),
    territory(444, "Alexander - The Arm of the Father", "Alexander - The Arm of the Father", Raid, Normal),
    territory(445, "Alexander - The Burden of the Father", "Alexander - The Burden of the Father", Raid, Normal),
    territory(449, "Alexander - The Fist of the Father", "Alexander - The Fist of the Father (Savage)", Raid, Savage),
    territory(450, "Alexander - The Cuff of the Father", "Alexander - The Cuff of the Father (Savage)", Raid, Savage),
    territory(451, "Alexander - The Arm of the Father", "Alexander - The Arm of the Father (Savage)", Raid, Savage),
    territory(452, "Alexander - The Burden of the Father", "Alexander - The Burden of the Father (Savage)", Raid, Savage),
    territory(520, "Alexander - The Fist of the Son", "Alexander - The Fist of the Son", Raid, Normal),
    territory(521, "Alexander - The Cuff of the Son", "Alexander - The Cuff of the Son", Raid, Normal),
    territory(522, "Alexander - The Arm of the Son", "Alexander - The Arm of the Son", Raid, Normal),
    territory(523, "Alexander - The Burden of the Son", "Alexander - The Burden of the Son", Raid, Normal),
    territory(529, "Alexander - The Fist of the Son", "Alexander - The Fist of the Son (Savage)", Raid, Savage),
    territory(530, "Alexander - The Cuff of the Son", "Alexander - The Cuff of the Son (Savage)", Raid, Savage),
    territory(531, "Alexander - The Arm of the Son", "Alexander - The Arm of the Son (Savage)", Raid, Savage),
    territory(532, "Alexander - The Burden of the Son", "Alexander - The Burden of the Son (Savage)", Raid, Savage),
    territory(580, "Alexander - The Eyes of the Creator", "Alexander - The Eyes of the Creator", Raid, Normal),
    territory(581, "Alexander - The Breath of the Creator", "Alexander - The Breath of the Creator", Raid, Normal),
    territory(582, "Alexander - The Heart of the Creator", "Alexander - The Heart of the Creator", Raid, Normal),
    territory(583, "Alexander - The Soul of the Creator", "Alexander - The Soul of the Creator", Raid, Normal),
    territory(584, "Alexander - The Eyes of the Creator", "Alexander - The Eyes of the Creator (Savage)", Raid, Savage),
    territory(585, "Alexander - The Breath of the Creator", "Alexander - The Breath of the Creator (Savage)", Raid, Savage),
    territory(586, "Alexander - The Heart of the Creator", "Alexander - The Heart of the Creator (Savage)", Raid, Savage),
    territory(587, "Alexander - The Soul of the Creator", "Alexander - The Soul of the Creator (Savage)", Raid, Savage),
    // Stormblood raids
    territory(691, "Deltascape V1.0", "Deltascape V1.0", Raid, Normal),
    territory(692, "Deltascape V2.0", "Deltascape V2.0", Raid, Normal),
    territory(693, "Deltascape V3.0", "Deltascape V3.0", Raid, Normal),
    territory(694, "Deltascape V4.0", "Deltascape V4.0", Raid, Normal),
    territory(695, "Deltascape V1.0", "Deltascape V1.0 (Savage)", Raid, Savage),
    territory(696, "Deltascape V2.0", "Deltascape V2.0 (Savage)", Raid, Savage),
    territory(697, "Deltascape V3.0", "Deltascape V3.0 (Savage)", Raid, Savage),
    territory(698, "Deltascape V4.0", "Deltascape V4.0 (Savage)", Raid, Savage),
    territory(748, "Sigmascape V1.0", "Sigmascape V1.0", Raid, Normal),
    territory(749, "Sigmascape V2.0", "Sigmascape V2.0", Raid, Normal),
    territory(750, "Sigmascape V3.0", "Sigmascape V3.0", Raid, Normal),
    territory(751, "Sigmascape V4.0", "Sigmascape V4.0", Raid, Normal),
    territory(752, "Sigmascape V1.0", "Sigmascape V1.0 (Savage)", Raid, Savage),
    territory(753, "Sigmascape V2.0", "Sigmascape V2.0 (Savage)", Raid, Savage),
    territory(754, "Sigmascape V3.0", "Sigmascape V3.0 (Savage)", Raid, Savage),
    territory(755, "Sigmascape V4.0", "Sigmascape V4.0 (Savage)", Raid, Savage),
    territory(798, "Alphascape V1.0", "Alphascape V1.0", Raid, Normal),
    territory(799, "Alphascape V2.0", "Alphascape V2.0", Raid, Normal),
    territory(800, "Alphascape V3.0", "Alphascape V3.0", Raid, Normal),
    territory(801, "Alphascape V4.0", "Alphascape V4.0", Raid, Normal),
    territory(802, "Alphascape V1.0", "Alphascape V1.0 (Savage)", Raid, Savage),
    territory(803, "Alphascape V2.0", "Alphascape V2.0 (Savage)", Raid, Savage),
    territory(804, "Alphascape V3.0", "Alphascape V3.0 (Savage)", Raid, Savage),
    territory(805, "Alphascape V4.0", "Alphascape V4.0 (Savage)", Raid, Savage),
    // Shadowbringers raids
    territory(849, "Eden's Gate: Resurrection", "Eden's Gate: Resurrection", Raid, Normal),
    territory(850, "Eden's Gate: Descent", "Eden's Gate: Descent", Raid, Normal),
    territory(851, "Eden's Gate: Inundation", "Eden's Gate: Inundation", Raid, Normal),
    territory(852, "Eden's Gate: Sepulture", "Eden's Gate: Sepulture", Raid, Normal),
    territory(853, "Eden's Gate: Resurrection", "Eden's Gate: Resurrection (Savage)", Raid, Savage),
    territory(854, "Eden's Gate: Descent", "Eden's Gate: Descent (Savage)", Raid, Savage),
    territory(855, "Eden's Gate: Inundation", "Eden's Gate: Inundation (Savage)", Raid, Savage),
    territory(856, "Eden's Gate: Sepulture", "Eden's Gate: Sepulture (Savage)", Raid, Savage),
    territory(902, "Eden's Verse: Fulmination", "Eden's Verse: Fulmination", Raid, Normal),
    territory(903, "Eden's Verse: Furor", "Eden's Verse: Furor", Raid, Normal),
    territory(904, "Eden's Verse: Iconoclasm", "Eden's Verse: Iconoclasm", Raid, Normal),
    territory(905, "Eden's Verse: Refulgence", "Eden's Verse: Refulgence", Raid, Normal),
    territory(906, "Eden's Verse: Fulmination", "Eden's Verse: Fulmination (Savage)", Raid, Savage),
    territory(907, "Eden's Verse: Furor", "Eden's Verse: Furor (Savage)", Raid, Savage),
    territory(908, "Eden's Verse: Iconoclasm", "Eden's Verse: Iconoclasm (Savage)", Raid, Savage),
    territory(909, "Eden's Verse: Refulgence", "Eden's Verse: Refulgence (Savage)", Raid, Savage),
    territory(942, "Eden's Promise: Umbra", "Eden's Promise: Umbra", Raid, Normal),
    territory(943, "Eden's Promise: Litany", "Eden's Promise: Litany", Raid, Normal),
    territory(944, "Eden's Promise: Anamorphosis", "Eden's Promise: Anamorphosis", Raid, Normal),
    territory(945, "Eden's Promise: Eternity", "Eden's Promise: Eternity", Raid, Normal),
    territory(946, "Eden's Promise: Umbra", "Eden's Promise: Umbra (Savage)", Raid, Savage),
    territory(947, "Eden's Promise: Litany", "Eden's Promise: Litany (Savage)", Raid, Savage),
    territory(948, "Eden's Promise: Anamorphosis", "Eden's Promise: Anamorphosis (Savage)", Raid, Savage),
    territory(949, "Eden's Promise: Eternity", "Eden's Promise: Eternity (Savage)", Raid, Savage),
    // Endwalker raids
    territory(1002, "Asphodelos: The First Circle", "Asphodelos: The First Circle", Raid, Normal),
    territory(1003, "Asphodelos: The First Circle", "Asphodelos: The First Circle (Savage)", Raid, Savage),
    territory(1004, "Asphodelos: The Second Circle", "Asphodelos: The Second Circle", Raid, Normal),
    territory(1005, "Asphodelos: The Second Circle", "Asphodelos: The Second Circle (Savage)", Raid, Savage),
    territory(1006, "Asphodelos: The Third Circle", "Asphodelos: The Third Circle", Raid, Normal),
    territory(1007, "Asphodelos: The Third Circle", "Asphodelos: The Third Circle (Savage)", Raid, Savage),
    territory(1008, "Asphodelos: The Fourth Circle", "Asphodelos: The Fourth Circle", Raid, Normal),
    territory(1009, "Asphodelos: The Fourth Circle", "Asphodelos: The Fourth Circle (Savage)", Raid, Savage),
    territory(1081, "Abyssos: The Fifth Circle", "Abyssos: The Fifth Circle", Raid, Normal),
    territory(1082, "Abyssos: The Fifth Circle", "Abyssos: The Fifth Circle (Savage)", Raid, Savage),
    territory(1083, "Abyssos: The Sixth Circle", "Abyssos: The Sixth Circle", Raid, Normal),
    territory(1084, "Abyssos: The Sixth Circle", "Abyssos: The Sixth Circle (Savage)", Raid, Savage),
    territory(1085, "Abyssos: The Seventh Circle", "Abyssos: The Seventh Circle", Raid, Normal),
    territory(1086, "Abyssos: The Seventh Circle", "Abyssos: The Seventh Circle (Savage)", Raid, Savage),
    territory(1087, "Abyssos: The Eighth Circle", "Abyssos: The Eighth Circle", Raid, Normal),
    territory(1088, "Abyssos: The Eighth Circle", "Abyssos: The Eighth Circle (Savage)", Raid, Savage),
    territory(1147, "Anabaseios: The Ninth Circle", "Anabaseios: The Ninth Circle", Raid, Normal),
    territory(1148, "Anabaseios: The Ninth Circle", "Anabaseios: The Ninth Circle (Savage)", Raid, Savage),
    territory(1149, "Anabaseios: The Tenth Circle", "Anabaseios: The Tenth Circle", Raid, Normal),
    territory(1150, "Anabaseios: The Tenth Circle", "Anabaseios: The Tenth Circle (Savage)", Raid, Savage),
    territory(1151, "Anabaseios: The Eleventh Circle", "Anabaseios: The Eleventh Circle", Raid, Normal),
    territory(1152, "Anabaseios: The Eleventh Circle", "Anabaseios: The Eleventh Circle (Savage)", Raid, Savage),
    territory(1153, "Anabaseios: The Twelfth Circle", "Anabaseios: The Twelfth Circle", Raid, Normal),
    territory(1154, "Anabaseios: The Twelfth Circle", "Anabaseios: The Twelfth Circle (Savage)", Raid, Savage),
    // Dawntrail raids
    territory(1225, "AAC Light-heavyweight M1", "AAC Light-heavyweight M1", Raid, Normal),
    territory(1226, "AAC Light-heavyweight M1", "AAC Light-heavyweight M1 (Savage)", Raid, Savage),
    territory(1227, "AAC Light-heavyweight M2", "AAC Light-heavyweight M2", Raid, Normal),
    territory(1228, "AAC Light-heavyweight M2", "AAC Light-heavyweight M2 (Savage)", Raid, Savage),
    territory(1229, "AAC Light-heavyweight M3", "AAC Light-heavyweight M3", Raid, Normal),
    territory(1230, "AAC Light-heavyweight M3", "AAC Light-heavyweight M3 (Savage)", Raid, Savage),
    territory(1231, "AAC Light-heavyweight M4", "AAC Light-heavyweight M4", Raid, Normal),
    territory(1232, "AAC Light-heavyweight M4", "AAC Light-heavyweight M4 (Savage)", Raid, Savage),
    territory(1256, "AAC Cruiserweight M1", "AAC Cruiserweight M1", Raid, Normal),
    territory(1257, "AAC Cruiserweight M1", "AAC Cruiserweight M1 (Savage)", Raid, Savage),
    territory(1258, "AAC Cruiserweight M2", "AAC Cruiserweight M2", Raid, Normal),
    territory(1259, "AAC Cruiserweight M2", "AAC Cruiserweight M2 (Savage)", Raid, Savage),
    territory(1260, "AAC Cruiserweight M3", "AAC Cruiserweight M3", Raid, Normal),
    territory(1261, "AAC Cruiserweight M3", "AAC Cruiserweight M3 (Savage)", Raid, Savage),
    territory(1262, "AAC Cruiserweight M4", "AAC Cruiserweight M4", Raid, Normal),
    territory(1263, "AAC Cruiserweight M4", "AAC Cruiserweight M4 (Savage)", Raid, Savage),
    // Ultimates
    territory(733, "the Unending Coil of Bahamut", "the Unending Coil of Bahamut (Ultimate)", Raid, Ultimate),
    territory(777, "the Weapon's Refrain", "The Weapon's Refrain (Ultimate)", Raid, Ultimate),
    territory(887, "the Epic of Alexander", "the Epic of Alexander (Ultimate)", Raid, Ultimate),
    territory(968, "Dragonsong's Reprise", "Dragonsong's Reprise (Ultimate)", Raid, Ultimate),
    territory(1122, "the Omega Protocol", "the Omega Protocol (Ultimate)", Raid, Ultimate),
    territory(1238, "Futures Rewritten", "Futures Rewritten (Ultimate)", Raid, Ultimate),
    // Alliance raids
    territory(174, "the Labyrinth of the Ancients", "the Labyrinth of the Ancients", AllianceRaid, Normal),
    territory(372, "Syrcus Tower", "Syrcus Tower", AllianceRaid, Normal),
    territory(151, "the World of Darkness", "the World of Darkness", AllianceRaid, Normal),
    territory(508, "the Void Ark", "the Void Ark", AllianceRaid, Normal),
    territory(556, "the Weeping City of Mhach", "the Weeping City of Mhach", AllianceRaid, Normal),
    territory(627, "Dun Scaith", "Dun Scaith", AllianceRaid, Normal),
    territory(734, "the Royal City of Rabanastre", "the Royal City of Rabanastre", AllianceRaid, Normal),
    territory(776, "the Ridorana Lighthouse", "the Ridorana Lighthouse", AllianceRaid, Normal),
    territory(826, "the Orbonne Monastery", "the Orbonne Monastery", AllianceRaid, Normal),
    territory(882, "the Copied Factory", "the Copied Factory", AllianceRaid, Normal),
    territory(917, "the Puppets' Bunker", "The Puppets' Bunker", AllianceRaid, Normal),
    territory(966, "the Tower at Paradigm's Breach", "The Tower at Paradigm's Breach", AllianceRaid, Normal),
    territory(1054, "Aglaia", "Aglaia", AllianceRaid, Normal),
    territory(1118, "Euphrosyne", "Euphrosyne", AllianceRaid, Normal),
    territory(1178, "Thaleia", "Thaleia", AllianceRaid, Normal),
    territory(1248, "Jeuno: The First Walk", "Jeuno: The First Walk", AllianceRaid, Normal),
    territory(1241, "the Cloud of Darkness", "the Cloud of Darkness (Chaotic)", AllianceRaid, Chaotic),
];

lazy_static! {
    static ref TERRITORIES_BY_ZONE_ID: HashMap<u32, &'static Territory> = TERRITORIES
        .iter()
        .map(|territory| (territory.zone_id, territory))
        .collect();
}

pub fn lookup_territory(zone_id: u32) -> Option<&'static Territory> {
    TERRITORIES_BY_ZONE_ID.get(&zone_id).copied()
}

#[cfg(test)]
mod tests {
    use super::{lookup_territory, ContentType, Difficulty, RecordingMode, TERRITORIES};
    use crate::encounter::EncounterCategory;
    use std::collections::HashSet;

    #[test]
    fn zone_ids_are_unique() {
        let mut seen = HashSet::new();
        for territory in TERRITORIES {
            assert!(
                seen.insert(territory.zone_id),
                "Zone id {} is declared more than once",
                territory.zone_id
            );
        }
    }

    #[test]
    fn dungeons_record_the_whole_instance() {
        let territory = lookup_territory(978).expect("Expected the Aitiascope to resolve");

        assert_eq!(territory.content_type, ContentType::Dungeon);
        assert_eq!(territory.recording_mode(), RecordingMode::WholeInstance);
        assert_eq!(territory.category(), EncounterCategory::Dungeons);
        assert!(!territory.ends_on_roster_wipe());
    }

    #[test]
    fn ultimates_and_chaotic_are_pull_based() {
        let ultimate = lookup_territory(1238).expect("Expected FRU to resolve");
        let chaotic = lookup_territory(1241).expect("Expected Cloud of Darkness to resolve");

        assert_eq!(ultimate.difficulty, Difficulty::Ultimate);
        assert_eq!(ultimate.recording_mode(), RecordingMode::PerPull);
        assert_eq!(ultimate.category(), EncounterCategory::Raids);
        assert_eq!(chaotic.recording_mode(), RecordingMode::PerPull);
        assert!(chaotic.ends_on_roster_wipe());
    }

    #[test]
    fn variant_and_criterion_end_on_roster_wipe() {
        let variant = lookup_territory(1069).expect("Expected Sil'dihn to resolve");
        let criterion = lookup_territory(1156).expect("Expected Another Mount Rokkon to resolve");
        let trial = lookup_territory(1196).expect("Expected Worqor Lar Dor to resolve");

        assert!(variant.ends_on_roster_wipe());
        assert!(criterion.ends_on_roster_wipe());
        assert_eq!(variant.recording_mode(), RecordingMode::PerPull);
        assert!(!trial.ends_on_roster_wipe());
    }

    #[test]
    fn every_expansion_resolves_for_each_content_type() {
        let samples = [
            (1036, "Sastasha", ContentType::Dungeon, Difficulty::Normal),
            (387, "Sastasha", ContentType::Dungeon, Difficulty::Hard),
            (416, "the Great Gubal Library", ContentType::Dungeon, Difficulty::Normal),
            (689, "Ala Mhigo", ContentType::Dungeon, Difficulty::Normal),
            (838, "Amaurot", ContentType::Dungeon, Difficulty::Normal),
            (970, "Vanaspati", ContentType::Dungeon, Difficulty::Normal),
            (1199, "Alexandria", ContentType::Dungeon, Difficulty::Normal),
            (297, "the Howling Eye", ContentType::Trial, Difficulty::Extreme),
            (446, "Thok ast Thok", ContentType::Trial, Difficulty::Extreme),
            (677, "the Pool of Tribute", ContentType::Trial, Difficulty::Extreme),
            (923, "the Seat of Sacrifice", ContentType::Trial, Difficulty::Extreme),
            (1072, "Storm's Crown", ContentType::Trial, Difficulty::Extreme),
            (1200, "Everkeep", ContentType::Trial, Difficulty::Normal),
            (241, "the Binding Coil of Bahamut - Turn 1", ContentType::Raid, Difficulty::Normal),
            (587, "Alexander - The Soul of the Creator", ContentType::Raid, Difficulty::Savage),
            (801, "Alphascape V4.0", ContentType::Raid, Difficulty::Normal),
            (949, "Eden's Promise: Eternity", ContentType::Raid, Difficulty::Savage),
            (1003, "Asphodelos: The First Circle", ContentType::Raid, Difficulty::Savage),
            (1232, "AAC Light-heavyweight M4", ContentType::Raid, Difficulty::Savage),
            (372, "Syrcus Tower", ContentType::AllianceRaid, Difficulty::Normal),
            (627, "Dun Scaith", ContentType::AllianceRaid, Difficulty::Normal),
            (826, "the Orbonne Monastery", ContentType::AllianceRaid, Difficulty::Normal),
            (966, "the Tower at Paradigm's Breach", ContentType::AllianceRaid, Difficulty::Normal),
            (1118, "Euphrosyne", ContentType::AllianceRaid, Difficulty::Normal),
            (1248, "Jeuno: The First Walk", ContentType::AllianceRaid, Difficulty::Normal),
        ];

        for (zone_id, name, content_type, difficulty) in samples {
            let territory = lookup_territory(zone_id)
                .unwrap_or_else(|| panic!("Expected zone {zone_id} ({name}) to resolve"));
            assert_eq!(territory.name, name, "Wrong name for zone {zone_id}");
            assert_eq!(territory.content_type, content_type, "Wrong content type for {name}");
            assert_eq!(territory.difficulty, difficulty, "Wrong difficulty for {name}");
        }
    }

    #[test]
    fn hard_dungeons_still_record_the_whole_instance() {
        let territory = lookup_territory(387).expect("Expected Sastasha (Hard) to resolve");

        assert_eq!(territory.raw_name, "Sastasha (Hard)");
        assert_eq!(territory.recording_mode(), RecordingMode::WholeInstance);
        assert_eq!(territory.category(), EncounterCategory::Dungeons);
    }

    #[test]
    fn unknown_zone_resolves_to_nothing() {
        assert!(lookup_territory(0).is_none());
        assert!(lookup_territory(129).is_none());
    }
}
