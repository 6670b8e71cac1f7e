use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const INSTALL_RECORD_FILENAME: &str = "pytorch_whisper_installed.json";

/// Which runtime flavor was installed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallVersion {
    Cpu,
    Cuda,
}

impl InstallVersion {
    pub const ALL: &[InstallVersion] = &[InstallVersion::Cpu, InstallVersion::Cuda];
}

impl std::fmt::Display for InstallVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallVersion::Cpu => write!(f, "cpu"),
            InstallVersion::Cuda => write!(f, "cuda"),
        }
    }
}

/// Metadata persisted next to the installed runtime after a successful
/// install and read back during verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstallRecord {
    pub version: InstallVersion,
    pub time: String,
    pub platform: String,
    pub python: String,
}

impl InstallRecord {
    pub fn new(version: InstallVersion, platform: String, python: String) -> Self {
        Self {
            version,
            time: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            platform,
            python,
        }
    }

    pub fn save(&self, target_dir: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(target_dir.join(INSTALL_RECORD_FILENAME), json)
    }

    /// Read the record back; `Ok(None)` when no record exists yet.
    pub fn load(target_dir: &Path) -> std::io::Result<Option<Self>> {
        let path = target_dir.join(INSTALL_RECORD_FILENAME);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }
}

/// Wheel platform tag of the machine we are installing for.
pub fn platform_tag() -> String {
    #[cfg(target_os = "windows")]
    {
        if cfg!(target_pointer_width = "64") {
            "win_amd64".to_string()
        } else {
            "win32".to_string()
        }
    }
    #[cfg(not(target_os = "windows"))]
    {
        match std::env::consts::ARCH {
            "x86_64" => "linux_x86_64".to_string(),
            "aarch64" => "linux_aarch64".to_string(),
            other => other.to_string(),
        }
    }
}
