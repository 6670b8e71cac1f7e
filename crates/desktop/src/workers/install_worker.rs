use std::thread;

use crossbeam_channel::{unbounded, Receiver};

use voxtitle_core::install::domain::install_record::{InstallRecord, InstallVersion};
use voxtitle_core::install::infrastructure::pip_package_manager::PipPackageManager;
use voxtitle_core::pipeline::install_runtime_use_case::InstallRuntimeUseCase;
use voxtitle_core::pipeline::verify_install_use_case::{VerifyInstallUseCase, VerifyReport};
use voxtitle_core::shared::runtime_env::{bundled_wheels_dir, RuntimeEnv};

/// Messages sent from the install/verify workers to the UI.
pub enum InstallEvent {
    Log(String),
    Installed(InstallRecord),
    Verified(VerifyReport),
    Failed(String),
}

pub fn spawn_install(version: InstallVersion, env: RuntimeEnv) -> Receiver<InstallEvent> {
    let (tx, rx) = unbounded::<InstallEvent>();

    thread::spawn(move || {
        let manager = PipPackageManager::new(env.python.clone());
        let use_case = InstallRuntimeUseCase::new(
            Box::new(manager),
            env.lib_dir.clone(),
            bundled_wheels_dir(),
        );

        let log_tx = tx.clone();
        let mut log = |line: &str| {
            let _ = log_tx.send(InstallEvent::Log(line.to_string()));
        };

        let event = match use_case.execute(version, &mut log) {
            Ok(record) => InstallEvent::Installed(record),
            Err(e) => InstallEvent::Failed(e.to_string()),
        };
        let _ = tx.send(event);
    });

    rx
}

pub fn spawn_verify(env: RuntimeEnv) -> Receiver<InstallEvent> {
    let (tx, rx) = unbounded::<InstallEvent>();

    thread::spawn(move || {
        let use_case = VerifyInstallUseCase::new(env.python.clone(), env.lib_dir.clone());

        let log_tx = tx.clone();
        let mut log = |line: &str| {
            let _ = log_tx.send(InstallEvent::Log(line.to_string()));
        };

        let event = match use_case.execute(&mut log) {
            Ok(report) => InstallEvent::Verified(report),
            Err(e) => InstallEvent::Failed(e.to_string()),
        };
        let _ = tx.send(event);
    });

    rx
}
