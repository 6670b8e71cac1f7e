use serde::{Deserialize, Serialize};

/// Whisper model variants offered to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelSize {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
    LargeV2,
    LargeV3,
    LargeV3Turbo,
}

impl ModelSize {
    pub const ALL: &[ModelSize] = &[
        ModelSize::Tiny,
        ModelSize::Base,
        ModelSize::Small,
        ModelSize::Medium,
        ModelSize::Large,
        ModelSize::LargeV2,
        ModelSize::LargeV3,
        ModelSize::LargeV3Turbo,
    ];

    /// Identifier understood by the transcription tool.
    pub fn as_str(self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
            ModelSize::LargeV2 => "large-v2",
            ModelSize::LargeV3 => "large-v3",
            ModelSize::LargeV3Turbo => "large-v3-turbo",
        }
    }

    /// Approximate download size, shown in the confirmation dialog.
    pub fn download_size(self) -> &'static str {
        match self {
            ModelSize::Tiny => "~75 MB",
            ModelSize::Base => "~142 MB",
            ModelSize::Small => "~466 MB",
            ModelSize::Medium => "~1.46 GB",
            ModelSize::Large | ModelSize::LargeV2 => "~2.96 GB",
            ModelSize::LargeV3 => "~3.09 GB",
            ModelSize::LargeV3Turbo => "~1.6 GB",
        }
    }

    /// Rough processing-time multiplier relative to audio duration,
    /// used for the estimate shown when a file is selected.
    pub fn speed_factor(self) -> f64 {
        match self {
            ModelSize::Tiny => 0.5,
            ModelSize::Base => 0.8,
            ModelSize::Small => 1.2,
            ModelSize::Medium => 2.0,
            ModelSize::Large | ModelSize::LargeV2 | ModelSize::LargeV3 => 3.5,
            ModelSize::LargeV3Turbo => 2.5,
        }
    }

    /// Filename of the whisper.cpp model used by the native engine.
    pub fn ggml_filename(self) -> String {
        format!("ggml-{}.bin", self.as_str())
    }

    /// Filename of the checkpoint the CLI tool caches after download.
    pub fn checkpoint_filename(self) -> String {
        format!("{}.pt", self.as_str())
    }
}

impl std::fmt::Display for ModelSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ModelSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelSize::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown model size '{s}'"))
    }
}
