use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use thiserror::Error;

/// Result of importing the runtime from the install directory.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RuntimeProbe {
    pub torch: String,
    pub cuda: bool,
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to run the interpreter: {0}")]
    Io(#[source] std::io::Error),
    #[error("runtime import failed: {0}")]
    ImportFailed(String),
    #[error("unexpected probe output: {0}")]
    BadOutput(String),
}

/// Import the runtime and transcription library from `lib_dir` in a fresh
/// interpreter and report version plus accelerator availability.
///
/// A fresh process is the equivalent of purging previously loaded modules:
/// nothing from an earlier install can shadow the probe.
pub fn probe_runtime(python: &Path, lib_dir: &Path) -> Result<RuntimeProbe, ProbeError> {
    let script = format!(
        "import sys, json; sys.path.insert(0, {lib_dir:?}); \
         import torch, whisper; \
         print(json.dumps({{\"torch\": torch.__version__, \"cuda\": torch.cuda.is_available()}}))",
        lib_dir = lib_dir.display().to_string(),
    );

    let output = Command::new(python)
        .arg("-c")
        .arg(&script)
        .output()
        .map_err(ProbeError::Io)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(ProbeError::ImportFailed(stderr));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let line = stdout.trim();
    parse_probe_output(line)
}

fn parse_probe_output(line: &str) -> Result<RuntimeProbe, ProbeError> {
    serde_json::from_str(line).map_err(|_| ProbeError::BadOutput(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let probe = parse_probe_output(r#"{"torch": "2.3.0+cpu", "cuda": false}"#).unwrap();
        assert_eq!(probe.torch, "2.3.0+cpu");
        assert!(!probe.cuda);
    }

    #[test]
    fn test_parse_probe_output_garbage() {
        assert!(matches!(
            parse_probe_output("Traceback (most recent call last)"),
            Err(ProbeError::BadOutput(_))
        ));
    }
}
