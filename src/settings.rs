use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::encounter::EncounterCategory;

pub const CONFIG_PATH_ENV: &str = "XIVPOV_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse settings file '{path}': {message}")]
    Parse { path: String, message: String },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherSettings {
    pub endpoint_url: String,
    pub idle_timeout_minutes: u64,
    pub reconnect_delay_seconds: u64,
    pub min_encounter_duration_seconds: u64,
    pub record_dungeons: bool,
    pub record_trials: bool,
    pub record_raids: bool,
    pub record_alliance_raids: bool,
    pub record_manual: bool,
}

impl Default for WatcherSettings {
    fn default() -> Self {
        Self {
            endpoint_url: "ws://127.0.0.1:10501/ws".to_string(),
            idle_timeout_minutes: 10,
            reconnect_delay_seconds: 5,
            min_encounter_duration_seconds: 15,
            record_dungeons: true,
            record_trials: true,
            record_raids: true,
            record_alliance_raids: true,
            record_manual: true,
        }
    }
}

impl WatcherSettings {
    /// Missing file means defaults; anything unreadable is an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|error| SettingsError::Read {
            path: path.display().to_string(),
            message: error.to_string(),
        })?;

        Self::from_toml(&contents).map_err(|message| SettingsError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        toml::from_str::<Self>(contents).map_err(|error| error.to_string())
    }

    /// First CLI argument, then the environment, then nothing.
    pub fn resolve_path(cli_argument: Option<String>) -> Option<PathBuf> {
        cli_argument
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_minutes.saturating_mul(60))
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_seconds)
    }

    pub fn allows_category(&self, category: EncounterCategory) -> bool {
        match category {
            EncounterCategory::Dungeons => self.record_dungeons,
            EncounterCategory::Trials => self.record_trials,
            EncounterCategory::Raids => self.record_raids,
            EncounterCategory::AllianceRaids => self.record_alliance_raids,
            EncounterCategory::Manual => self.record_manual,
        }
    }
}
