use std::path::PathBuf;
use std::process::Command;

use crate::install::domain::package_manager::{PackageManager, StepOutput};

/// Package manager backed by `python -m pip`.
pub struct PipPackageManager {
    python: PathBuf,
}

impl PipPackageManager {
    pub fn new(python: PathBuf) -> Self {
        Self { python }
    }
}

impl PackageManager for PipPackageManager {
    fn install(&self, args: &[String]) -> Result<StepOutput, Box<dyn std::error::Error>> {
        log::info!("pip {}", args.join(" "));
        let output = Command::new(&self.python)
            .args(["-m", "pip"])
            .args(args)
            .output()
            .map_err(|e| format!("failed to run {}: {e}", self.python.display()))?;

        let mut log = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !log.is_empty() && !log.ends_with('\n') {
                log.push('\n');
            }
            log.push_str(&stderr);
        }

        Ok(StepOutput {
            exit_code: output.status.code().unwrap_or(-1),
            log,
        })
    }

    fn runtime_version(&self) -> Result<String, Box<dyn std::error::Error>> {
        let output = Command::new(&self.python)
            .arg("--version")
            .output()
            .map_err(|e| format!("failed to run {}: {e}", self.python.display()))?;
        if !output.status.success() {
            return Err(format!("{} --version failed", self.python.display()).into());
        }
        // "Python 3.11.4" on stdout (stderr on very old interpreters)
        let text = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };
        Ok(text.split_whitespace().last().unwrap_or("unknown").to_string())
    }
}
