use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use voxtitle_core::transcript::domain::decode_options::DecodeOptions;
use voxtitle_core::transcript::domain::model_size::ModelSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    System,
    Dark,
    Light,
}

impl Appearance {
    pub const ALL: &[Appearance] = &[Appearance::System, Appearance::Dark, Appearance::Light];
}

impl std::fmt::Display for Appearance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Appearance::System => write!(f, "System"),
            Appearance::Dark => write!(f, "Dark"),
            Appearance::Light => write!(f, "Light"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub appearance: Appearance,
    pub model: ModelSize,
    pub language: String,
    pub temperature: f64,
    pub best_of: u32,
    pub beam_size: u32,
    pub logprob_threshold: f64,
    pub no_speech_threshold: f64,
    pub condition_on_previous_text: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let decode = DecodeOptions::default();
        Self {
            appearance: Appearance::System,
            model: ModelSize::Small,
            language: "auto".to_string(),
            temperature: decode.temperature,
            best_of: decode.best_of,
            beam_size: decode.beam_size,
            logprob_threshold: decode.logprob_threshold,
            no_speech_threshold: decode.no_speech_threshold,
            condition_on_previous_text: decode.condition_on_previous_text,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("VoxTitle").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            if let Ok(json) = serde_json::to_string_pretty(self) {
                let _ = fs::write(path, json);
            }
        }
    }

    /// Decode options for a run; the initial prompt is filled in separately.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            language: (self.language != "auto").then(|| self.language.clone()),
            initial_prompt: None,
            temperature: self.temperature,
            best_of: self.best_of,
            beam_size: self.beam_size,
            logprob_threshold: self.logprob_threshold,
            no_speech_threshold: self.no_speech_threshold,
            condition_on_previous_text: self.condition_on_previous_text,
        }
    }
}
