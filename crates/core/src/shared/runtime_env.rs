use std::env;
use std::path::{Path, PathBuf};

use crate::shared::constants::{BUNDLED_WHEELS_DIR, RUNTIME_DIR_NAME};

/// Where the application-local runtime lives and which interpreter runs it.
///
/// Availability is an explicit value computed here and threaded through to
/// the workers, never a process-wide flag.
#[derive(Clone, Debug)]
pub struct RuntimeEnv {
    pub python: PathBuf,
    pub lib_dir: PathBuf,
}

impl RuntimeEnv {
    pub fn new(python: PathBuf, lib_dir: PathBuf) -> Self {
        Self { python, lib_dir }
    }

    /// Resolve the default environment: a `python3`/`python` from PATH and
    /// the runtime directory next to the executable.
    pub fn discover() -> Self {
        let python = which::which("python3")
            .or_else(|_| which::which("python"))
            .unwrap_or_else(|_| PathBuf::from("python3"));
        Self {
            python,
            lib_dir: default_lib_dir(),
        }
    }

    /// True when an installed transcription entry point is present.
    pub fn is_runtime_installed(&self) -> bool {
        whisper_entry_point(&self.lib_dir).is_some()
    }
}

/// Runtime directory next to the running executable, falling back to a
/// relative path when the executable location is unknown.
pub fn default_lib_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|d| d.join(RUNTIME_DIR_NAME)))
        .unwrap_or_else(|| PathBuf::from(RUNTIME_DIR_NAME))
}

/// Directory of pre-bundled wheels shipped next to the executable, if any.
pub fn bundled_wheels_dir() -> Option<PathBuf> {
    let dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|d| d.join(BUNDLED_WHEELS_DIR)))?;
    dir.is_dir().then_some(dir)
}

/// Locate the transcription tool's console script inside the runtime
/// directory (`bin/` on Unix, `Scripts/` on Windows).
pub fn whisper_entry_point(lib_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        lib_dir.join("bin").join("whisper"),
        lib_dir.join("Scripts").join("whisper.exe"),
    ];
    candidates.into_iter().find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_entry_point_missing() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(whisper_entry_point(tmp.path()).is_none());
    }

    #[test]
    fn test_entry_point_found_in_bin() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bin = tmp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("whisper"), b"#!/usr/bin/env python").unwrap();
        let found = whisper_entry_point(tmp.path()).unwrap();
        assert!(found.ends_with("bin/whisper"));
    }

    #[test]
    fn test_runtime_not_installed_for_empty_dir() {
        let tmp = tempfile::TempDir::new().unwrap();
        let env = RuntimeEnv::new(PathBuf::from("python3"), tmp.path().to_path_buf());
        assert!(!env.is_runtime_installed());
    }
}
