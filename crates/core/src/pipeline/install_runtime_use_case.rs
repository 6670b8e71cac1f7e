use std::fs;
use std::path::PathBuf;

use crate::install::domain::cleanup;
use crate::install::domain::install_record::{platform_tag, InstallRecord, InstallVersion};
use crate::install::domain::package_manager::PackageManager;
use crate::install::infrastructure::cuda_toolkit;
use crate::shared::constants::{
    CLEANUP_PATTERNS, CORE_RUNTIME_PACKAGES, CPU_WHEEL_INDEX_URL, EXTRA_RUNTIME_PACKAGES,
    TRANSCRIPTION_PACKAGE,
};

/// Installs the numerical runtime and the transcription library into the
/// application-local target directory.
///
/// The sequence is: resolve the wheel index (refusing an unsupported CUDA
/// toolkit before anything is touched), clean previous artifacts, run three
/// install steps that must each exit zero, then persist the install record.
pub struct InstallRuntimeUseCase {
    manager: Box<dyn PackageManager>,
    target_dir: PathBuf,
    bundled_wheels_dir: Option<PathBuf>,
}

impl InstallRuntimeUseCase {
    pub fn new(
        manager: Box<dyn PackageManager>,
        target_dir: PathBuf,
        bundled_wheels_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            manager,
            target_dir,
            bundled_wheels_dir,
        }
    }

    pub fn execute(
        &self,
        version: InstallVersion,
        log: &mut dyn FnMut(&str),
    ) -> Result<InstallRecord, Box<dyn std::error::Error>> {
        let index_url = match version {
            InstallVersion::Cpu => CPU_WHEEL_INDEX_URL.to_string(),
            InstallVersion::Cuda => cuda_toolkit::wheel_index_url()?,
        };

        fs::create_dir_all(&self.target_dir)?;

        log("Cleaning up previous installation...");
        let removed = cleanup::clean_target_dir(&self.target_dir, CLEANUP_PATTERNS, log);
        log(&format!("Cleanup complete: {removed} items removed"));

        let target = self.target_dir.display().to_string();

        log(&format!("Index URL (core): {index_url}"));
        let mut core_args = args_with_packages(CORE_RUNTIME_PACKAGES);
        core_args.extend(strings(&["--index-url", &index_url, "--only-binary", ":all:"]));
        core_args.extend(common_flags(&target));
        self.run_step("pytorch-core", &core_args, log)?;

        log("Index URL (extra): default package index");
        let mut extra_args = args_with_packages(EXTRA_RUNTIME_PACKAGES);
        extra_args.extend(strings(&["--only-binary", ":all:"]));
        extra_args.extend(common_flags(&target));
        self.run_step("pytorch-extras", &extra_args, log)?;

        let mut whisper_args = match self.find_bundled_wheel() {
            Some(wheel) => {
                log(&format!(
                    "Using bundled wheel: {}",
                    wheel.file_name().unwrap_or_default().to_string_lossy()
                ));
                vec![
                    "install".to_string(),
                    wheel.display().to_string(),
                    "--no-deps".to_string(),
                ]
            }
            None => {
                log("No bundled wheel found; installing from the package index");
                strings(&[
                    "install",
                    TRANSCRIPTION_PACKAGE,
                    "--only-binary",
                    ":all:",
                    "--no-deps",
                ])
            }
        };
        whisper_args.extend(common_flags(&target));
        self.run_step(TRANSCRIPTION_PACKAGE, &whisper_args, log)?;

        let record = InstallRecord::new(version, platform_tag(), self.manager.runtime_version()?);
        record.save(&self.target_dir)?;
        log(&format!(
            "Installed {} runtime ({}) into {}",
            record.version, record.platform, target
        ));
        Ok(record)
    }

    fn run_step(
        &self,
        label: &str,
        args: &[String],
        log: &mut dyn FnMut(&str),
    ) -> Result<(), Box<dyn std::error::Error>> {
        log(&format!("[{label}] pip {}", args.join(" ")));
        let output = self.manager.install(args)?;
        for line in output.log.lines().filter(|l| !l.trim().is_empty()) {
            log(line);
        }
        if !output.success() {
            return Err(format!("{label} failed with exit-code {}", output.exit_code).into());
        }
        Ok(())
    }

    fn find_bundled_wheel(&self) -> Option<PathBuf> {
        let dir = self.bundled_wheels_dir.as_ref()?;
        fs::read_dir(dir)
            .ok()?
            .flatten()
            .map(|entry| entry.path())
            .find(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("openai_whisper-") && n.ends_with(".whl"))
            })
    }
}

fn args_with_packages(packages: &[&str]) -> Vec<String> {
    let mut args = vec!["install".to_string()];
    args.extend(packages.iter().map(|p| p.to_string()));
    args
}

fn common_flags(target: &str) -> Vec<String> {
    strings(&["--upgrade", "--no-cache-dir", "--target", target])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::domain::install_record::INSTALL_RECORD_FILENAME;
    use crate::install::domain::package_manager::StepOutput;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    // ─── Stubs ───

    struct StubManager {
        calls: Arc<Mutex<Vec<Vec<String>>>>,
        /// Step index (0-based) that should report a nonzero exit.
        fail_step: Option<usize>,
    }

    impl StubManager {
        fn new(fail_step: Option<usize>) -> (Self, Arc<Mutex<Vec<Vec<String>>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    calls: calls.clone(),
                    fail_step,
                },
                calls,
            )
        }
    }

    impl PackageManager for StubManager {
        fn install(&self, args: &[String]) -> Result<StepOutput, Box<dyn std::error::Error>> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(args.to_vec());
            if self.fail_step == Some(index) {
                Ok(StepOutput {
                    exit_code: 1,
                    log: "ERROR: no matching distribution".to_string(),
                })
            } else {
                Ok(StepOutput {
                    exit_code: 0,
                    log: format!("Successfully installed step {index}"),
                })
            }
        }

        fn runtime_version(&self) -> Result<String, Box<dyn std::error::Error>> {
            Ok("3.11.4".to_string())
        }
    }

    #[test]
    fn test_three_steps_in_order_then_record() {
        let tmp = TempDir::new().unwrap();
        let (manager, calls) = StubManager::new(None);
        let uc = InstallRuntimeUseCase::new(Box::new(manager), tmp.path().to_path_buf(), None);

        let mut log_lines = Vec::new();
        let record = uc
            .execute(InstallVersion::Cpu, &mut |line| {
                log_lines.push(line.to_string())
            })
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert!(calls[0].contains(&"torch".to_string()));
        assert!(calls[0].contains(&CPU_WHEEL_INDEX_URL.to_string()));
        assert!(calls[1].contains(&"tqdm".to_string()));
        assert!(calls[2].contains(&"openai-whisper".to_string()));
        for call in calls.iter() {
            assert!(call.contains(&"--target".to_string()));
            assert!(call.contains(&"--no-cache-dir".to_string()));
        }

        assert_eq!(record.version, InstallVersion::Cpu);
        assert_eq!(record.python, "3.11.4");
        assert!(tmp.path().join(INSTALL_RECORD_FILENAME).exists());
        assert!(log_lines
            .iter()
            .any(|l| l.contains("Successfully installed")));
    }

    #[test]
    fn test_failed_step_aborts_sequence_and_writes_no_record() {
        let tmp = TempDir::new().unwrap();
        let (manager, calls) = StubManager::new(Some(1));
        let uc = InstallRuntimeUseCase::new(Box::new(manager), tmp.path().to_path_buf(), None);

        let mut log_lines = Vec::new();
        let result = uc.execute(InstallVersion::Cpu, &mut |line| {
            log_lines.push(line.to_string())
        });

        assert!(result.is_err());
        assert_eq!(calls.lock().unwrap().len(), 2);
        assert!(!tmp.path().join(INSTALL_RECORD_FILENAME).exists());
        // Manager output surfaced verbatim
        assert!(log_lines
            .iter()
            .any(|l| l.contains("no matching distribution")));
    }

    #[test]
    fn test_cleanup_removes_previous_artifacts() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("torch")).unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"keep me").unwrap();

        let (manager, _calls) = StubManager::new(None);
        let uc = InstallRuntimeUseCase::new(Box::new(manager), tmp.path().to_path_buf(), None);
        uc.execute(InstallVersion::Cpu, &mut |_| {}).unwrap();

        assert!(!tmp.path().join("torch").exists());
        assert!(tmp.path().join("notes.txt").exists());
    }

    #[test]
    fn test_bundled_wheel_preferred_over_index() {
        let tmp = TempDir::new().unwrap();
        let wheels = TempDir::new().unwrap();
        let wheel_name = "openai_whisper-20240930-py3-none-any.whl";
        std::fs::write(wheels.path().join(wheel_name), b"wheel").unwrap();

        let (manager, calls) = StubManager::new(None);
        let uc = InstallRuntimeUseCase::new(
            Box::new(manager),
            tmp.path().to_path_buf(),
            Some(wheels.path().to_path_buf()),
        );
        uc.execute(InstallVersion::Cpu, &mut |_| {}).unwrap();

        let calls = calls.lock().unwrap();
        let whisper_call = &calls[2];
        assert!(whisper_call.iter().any(|a| a.ends_with(wheel_name)));
        assert!(whisper_call.contains(&"--no-deps".to_string()));
        assert!(!whisper_call.contains(&"openai-whisper".to_string()));
    }

    #[test]
    fn test_cuda_refused_without_toolkit_leaves_target_untouched() {
        // Only meaningful on machines without a CUDA toolkit.
        if which::which("nvcc").is_ok() {
            return;
        }
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("torch")).unwrap();

        let (manager, calls) = StubManager::new(None);
        let uc = InstallRuntimeUseCase::new(Box::new(manager), tmp.path().to_path_buf(), None);
        let result = uc.execute(InstallVersion::Cuda, &mut |_| {});

        assert!(result.is_err());
        assert!(calls.lock().unwrap().is_empty());
        // Nothing was cleaned or written
        assert!(tmp.path().join("torch").exists());
        assert!(!tmp.path().join(INSTALL_RECORD_FILENAME).exists());
    }
}
