use std::path::PathBuf;

use crate::install::domain::install_record::InstallRecord;
use crate::install::infrastructure::python_probe;
use crate::media::infrastructure::ffmpeg_probe;

/// Outcome of a successful verification.
#[derive(Clone, Debug)]
pub struct VerifyReport {
    pub runtime_version: String,
    pub cuda_available: bool,
    pub ffmpeg_version: String,
    pub record: Option<InstallRecord>,
}

/// Verifies an install by importing the runtime from the target directory
/// in a fresh interpreter and probing the external media tool. Both probes
/// must succeed.
pub struct VerifyInstallUseCase {
    python: PathBuf,
    target_dir: PathBuf,
}

impl VerifyInstallUseCase {
    pub fn new(python: PathBuf, target_dir: PathBuf) -> Self {
        Self { python, target_dir }
    }

    pub fn execute(
        &self,
        log: &mut dyn FnMut(&str),
    ) -> Result<VerifyReport, Box<dyn std::error::Error>> {
        log("Starting verification...");

        let probe = python_probe::probe_runtime(&self.python, &self.target_dir)?;
        log(&format!("Torch {}, CUDA: {}", probe.torch, probe.cuda));
        log("Whisper OK");

        let record = InstallRecord::load(&self.target_dir)?;
        if let Some(ref record) = record {
            log(&format!(
                "Installed version: {} @ {}",
                record.version, record.time
            ));
        }

        let ffmpeg_version = ffmpeg_probe::probe_ffmpeg()?;
        log(&ffmpeg_version);

        Ok(VerifyReport {
            runtime_version: probe.torch,
            cuda_available: probe.cuda,
            ffmpeg_version,
            record,
        })
    }
}
