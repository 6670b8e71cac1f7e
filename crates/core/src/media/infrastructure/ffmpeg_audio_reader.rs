use std::path::Path;
use std::process::Command;

use crate::media::domain::audio_reader::AudioReader;
use crate::shared::waveform::Waveform;

/// Decodes any supported audio container by shelling out to ffmpeg and
/// reading raw f32le samples from its stdout.
pub struct FfmpegAudioReader;

impl AudioReader for FfmpegAudioReader {
    fn load(
        &self,
        path: &Path,
        target_sample_rate: u32,
    ) -> Result<Waveform, Box<dyn std::error::Error>> {
        let ffmpeg =
            which::which("ffmpeg").map_err(|_| "ffmpeg not found on PATH; install ffmpeg")?;

        let output = Command::new(ffmpeg)
            .arg("-nostdin")
            .args(["-threads", "0"])
            .arg("-i")
            .arg(path)
            .args(["-f", "f32le"])
            .args(["-ac", "1"])
            .args(["-acodec", "pcm_f32le"])
            .args(["-ar", &target_sample_rate.to_string()])
            .arg("-")
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("ffmpeg failed to decode {}: {}", path.display(), stderr).into());
        }

        Ok(Waveform::new(
            bytes_to_samples(&output.stdout),
            target_sample_rate,
        ))
    }
}

fn bytes_to_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_samples_little_endian() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0.5f32.to_le_bytes());
        bytes.extend_from_slice(&(-1.0f32).to_le_bytes());
        assert_eq!(bytes_to_samples(&bytes), vec![0.5, -1.0]);
    }

    #[test]
    fn test_bytes_to_samples_ignores_trailing_partial() {
        let mut bytes = 1.0f32.to_le_bytes().to_vec();
        bytes.push(0xFF);
        assert_eq!(bytes_to_samples(&bytes), vec![1.0]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        if which::which("ffmpeg").is_err() {
            return;
        }
        let reader = FfmpegAudioReader;
        let result = reader.load(Path::new("/nonexistent/file.mp3"), 16000);
        assert!(result.is_err());
    }
}
