//! CUDA toolkit detection for the accelerated install.
//!
//! The wheel index only exists for a handful of CUDA releases, so anything
//! outside the allow-list is refused before the installer touches any file.

use std::process::Command;

use regex::Regex;
use thiserror::Error;

/// CUDA releases with a published wheel index, as `major || minor`.
pub const SUPPORTED_CUDA_RELEASES: &[&str] = &["118", "126", "128"];

#[derive(Error, Debug)]
pub enum CudaError {
    #[error("CUDA toolkit (nvcc) not found on PATH")]
    ToolkitNotFound,
    #[error("failed to run nvcc: {0}")]
    Io(#[source] std::io::Error),
    #[error("could not parse a CUDA release from nvcc output")]
    UnrecognizedVersion,
    #[error("CUDA {major}.{minor} has no supported wheel index")]
    UnsupportedVersion { major: String, minor: String },
}

/// Resolve the wheel index URL for the locally installed CUDA toolkit.
pub fn wheel_index_url() -> Result<String, CudaError> {
    let nvcc = which::which("nvcc").map_err(|_| CudaError::ToolkitNotFound)?;
    let output = Command::new(nvcc)
        .arg("--version")
        .output()
        .map_err(CudaError::Io)?;
    let text = String::from_utf8_lossy(&output.stdout);
    index_url_from_nvcc_output(&text)
}

fn index_url_from_nvcc_output(text: &str) -> Result<String, CudaError> {
    let (major, minor) = parse_release(text).ok_or(CudaError::UnrecognizedVersion)?;
    let release = format!("{major}{minor}");
    if !SUPPORTED_CUDA_RELEASES.contains(&release.as_str()) {
        return Err(CudaError::UnsupportedVersion { major, minor });
    }
    Ok(format!("https://download.pytorch.org/whl/cu{release}"))
}

/// Extract `(major, minor)` from nvcc's `release X.Y` banner.
pub fn parse_release(text: &str) -> Option<(String, String)> {
    let re = Regex::new(r"release\s+([0-9]+)\.([0-9]+)").unwrap();
    let caps = re.captures(text)?;
    Some((caps[1].to_string(), caps[2].to_string()))
}
