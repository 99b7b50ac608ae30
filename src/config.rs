use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::difficulty::{DEFAULT_DIFFICULTY, clamp_difficulty};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_diagnostic_length")]
    pub diagnostic_length: usize,
    #[serde(default = "default_practice_length")]
    pub practice_length: usize,
    #[serde(default = "default_starting_difficulty")]
    pub starting_difficulty: u32,
    #[serde(default = "default_enforce_timer")]
    pub enforce_timer: bool,
    #[serde(default = "default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
}

fn default_theme() -> String {
    "midnight".to_string()
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_diagnostic_length() -> usize {
    5
}
fn default_practice_length() -> usize {
    20
}
fn default_starting_difficulty() -> u32 {
    DEFAULT_DIFFICULTY
}
fn default_enforce_timer() -> bool {
    true
}
fn default_feedback_delay_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            locale: default_locale(),
            diagnostic_length: default_diagnostic_length(),
            practice_length: default_practice_length(),
            starting_difficulty: default_starting_difficulty(),
            enforce_timer: default_enforce_timer(),
            feedback_delay_ms: default_feedback_delay_ms(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("adaptutor")
            .join("config.toml")
    }

    /// Pull hand-edited values back into range. Unknown locales fall back
    /// to the default.
    pub fn validate(&mut self, known_locales: &[&str]) {
        self.diagnostic_length = self.diagnostic_length.clamp(1, 50);
        self.practice_length = self.practice_length.clamp(1, 100);
        self.starting_difficulty = clamp_difficulty(self.starting_difficulty);
        self.feedback_delay_ms = self.feedback_delay_ms.min(10_000);
        if !known_locales.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
    }
}
