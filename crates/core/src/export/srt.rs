//! SRT (SubRip) subtitle writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::transcript::domain::segment::TranscriptionSegment;

/// Convert seconds to an SRT timestamp (`HH:MM:SS,mmm`).
///
/// Milliseconds are truncated, not rounded.
pub fn seconds_to_srt_time(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0) as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Parse an SRT timestamp back into seconds.
pub fn parse_srt_time(ts: &str) -> Option<f64> {
    let (clock, millis) = ts.split_once(',')?;
    let mut parts = clock.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let secs: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let millis: u64 = millis.parse().ok()?;
    Some((hours * 3600 + minutes * 60 + secs) as f64 + millis as f64 / 1000.0)
}

pub fn write_srt(path: &Path, segments: &[TranscriptionSegment]) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    for (i, segment) in segments.iter().enumerate() {
        writeln!(file, "{}", i + 1)?;
        writeln!(
            file,
            "{} --> {}",
            seconds_to_srt_time(segment.start),
            seconds_to_srt_time(segment.end)
        )?;
        writeln!(file, "{}", segment.text)?;
        writeln!(file)?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "00:00:00,000")]
    #[case(1.5, "00:00:01,500")]
    #[case(3661.25, "01:01:01,250")]
    #[case(59.9994, "00:00:59,999")]
    fn test_seconds_to_srt_time(#[case] seconds: f64, #[case] expected: &str) {
        assert_eq!(seconds_to_srt_time(seconds), expected);
    }

    #[test]
    fn test_parse_srt_time() {
        assert_relative_eq!(parse_srt_time("01:01:01,250").unwrap(), 3661.25);
        assert!(parse_srt_time("not a time").is_none());
        assert!(parse_srt_time("01:01,250").is_none());
    }

    /// Formatting then parsing must recover the value within 1 ms.
    #[rstest]
    #[case(0.0)]
    #[case(1.5)]
    #[case(10.0015)]
    #[case(3661.2567)]
    #[case(7325.999)]
    fn test_round_trip_within_1ms(#[case] seconds: f64) {
        let recovered = parse_srt_time(&seconds_to_srt_time(seconds)).unwrap();
        assert!((recovered - seconds).abs() < 0.001 + 1e-9);
    }

    #[test]
    fn test_write_srt_layout() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.srt");
        let segments = vec![
            TranscriptionSegment {
                start: 0.0,
                end: 2.5,
                text: "First line".to_string(),
            },
            TranscriptionSegment {
                start: 2.5,
                end: 5.0,
                text: "Second line".to_string(),
            },
        ];
        write_srt(&path, &segments).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "1\n00:00:00,000 --> 00:00:02,500\nFirst line\n\n\
             2\n00:00:02,500 --> 00:00:05,000\nSecond line\n\n"
        );
    }
}
