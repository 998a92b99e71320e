use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::corpus::DEFAULT_LEVEL;
use crate::session::{AnswerMode, SessionOptions};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Local path or http(s) URL of `data.json`.
    #[serde(default = "default_data_source")]
    pub data_source: String,
    #[serde(default = "default_audio_dir")]
    pub audio_dir: String,
    #[serde(default = "default_audio_player")]
    pub audio_player: String,
    #[serde(default = "default_audio_player_args")]
    pub audio_player_args: Vec<String>,
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,
    /// Clip played after a correct multiple-choice pick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue_correct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue_incorrect: Option<String>,
    #[serde(default)]
    pub answer_mode: AnswerMode,
    #[serde(default = "default_filter_enabled")]
    pub filter_enabled: bool,
    #[serde(default = "default_filter_debounce_ms")]
    pub filter_debounce_ms: u64,
    #[serde(default = "default_distractor_count")]
    pub distractor_count: usize,
    #[serde(default = "default_min_level")]
    pub min_level: i32,
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_data_source() -> String {
    "data.json".to_string()
}
fn default_audio_dir() -> String {
    "voxdata".to_string()
}
fn default_audio_player() -> String {
    "mpv".to_string()
}
fn default_audio_player_args() -> Vec<String> {
    vec!["--really-quiet".to_string(), "--no-video".to_string()]
}
fn default_autoplay() -> bool {
    true
}
fn default_filter_enabled() -> bool {
    true
}
fn default_filter_debounce_ms() -> u64 {
    1000
}
fn default_distractor_count() -> usize {
    3
}
fn default_min_level() -> i32 {
    DEFAULT_LEVEL
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_source: default_data_source(),
            audio_dir: default_audio_dir(),
            audio_player: default_audio_player(),
            audio_player_args: default_audio_player_args(),
            autoplay: default_autoplay(),
            cue_correct: None,
            cue_incorrect: None,
            answer_mode: AnswerMode::default(),
            filter_enabled: default_filter_enabled(),
            filter_debounce_ms: default_filter_debounce_ms(),
            distractor_count: default_distractor_count(),
            min_level: default_min_level(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
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
            .join("reibun")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        self.distractor_count = self.distractor_count.clamp(1, 9);
        self.filter_debounce_ms = self.filter_debounce_ms.min(10_000);
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            answer_mode: self.answer_mode,
            filter_enabled: self.filter_enabled,
            distractor_count: self.distractor_count,
        }
    }
}
