//! WebVTT subtitle writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::transcript::domain::segment::TranscriptionSegment;

/// Convert seconds to a WebVTT timestamp (`HH:MM:SS.mmm`).
pub fn seconds_to_vtt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0) as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}")
}

pub fn write_vtt(path: &Path, segments: &[TranscriptionSegment]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "WEBVTT")?;
    writeln!(file)?;
    for segment in segments {
        writeln!(
            file,
            "{} --> {}",
            seconds_to_vtt_time(segment.start),
            seconds_to_vtt_time(segment.end)
        )?;
        writeln!(file, "{}", segment.text)?;
        writeln!(file)?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_vtt_time() {
        assert_eq!(seconds_to_vtt_time(3661.25), "01:01:01.250");
    }

    #[test]
    fn test_write_vtt_has_header_and_dot_separator() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.vtt");
        let segments = vec![TranscriptionSegment {
            start: 1.5,
            end: 3.25,
            text: "Hello world".to_string(),
        }];
        write_vtt(&path, &segments).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "WEBVTT\n\n00:00:01.500 --> 00:00:03.250\nHello world\n\n"
        );
    }
}
