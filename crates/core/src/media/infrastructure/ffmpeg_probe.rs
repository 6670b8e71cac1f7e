use std::process::Command;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("ffmpeg not found on PATH")]
    NotFound,
    #[error("failed to run ffmpeg: {0}")]
    Io(#[source] std::io::Error),
    #[error("ffmpeg -version exited with an error")]
    Failed,
}

/// Check that the external media tool is present; returns its version line.
pub fn probe_ffmpeg() -> Result<String, ProbeError> {
    let ffmpeg = which::which("ffmpeg").map_err(|_| ProbeError::NotFound)?;
    let output = Command::new(ffmpeg)
        .arg("-version")
        .output()
        .map_err(ProbeError::Io)?;
    if !output.status.success() {
        return Err(ProbeError::Failed);
    }
    Ok(first_line(&String::from_utf8_lossy(&output.stdout)))
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line() {
        assert_eq!(
            first_line("ffmpeg version 6.1\nbuilt with gcc\n"),
            "ffmpeg version 6.1"
        );
        assert_eq!(first_line(""), "");
    }
}
