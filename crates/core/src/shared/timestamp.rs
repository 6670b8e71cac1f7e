//! Timestamp conversions shared by the live log and the exporters.

/// Parse a `mm:ss.mmm` (or `mm:ss`) timestamp into seconds.
///
/// Minutes are not wrapped at 60; `75:02.500` parses to 4502.5.
pub fn parse_min_sec(ts: &str) -> Option<f64> {
    let (minutes, seconds) = ts.split_once(':')?;
    let minutes: u64 = minutes.parse().ok()?;
    let seconds: f64 = seconds.parse().ok()?;
    Some(minutes as f64 * 60.0 + seconds)
}

/// Format seconds as `mm:ss.mmm` with total (unwrapped) minutes.
pub fn format_min_sec(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    let rest = seconds - minutes as f64 * 60.0;
    format!("{minutes:02}:{rest:06.3}")
}

/// Format whole seconds as `H:MM:SS` (hours unpadded).
pub fn format_clock(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("00:01.500", 1.5)]
    #[case("01:30.000", 90.0)]
    #[case("75:02.500", 4502.5)]
    #[case("01:30", 90.0)]
    fn test_parse_min_sec(#[case] input: &str, #[case] expected: f64) {
        assert_relative_eq!(parse_min_sec(input).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_parse_min_sec_rejects_garbage() {
        assert!(parse_min_sec("nonsense").is_none());
        assert!(parse_min_sec("1.5").is_none());
        assert!(parse_min_sec("a:b").is_none());
    }

    #[rstest]
    #[case(1.5, "00:01.500")]
    #[case(90.0, "01:30.000")]
    #[case(4502.5, "75:02.500")]
    fn test_format_min_sec(#[case] seconds: f64, #[case] expected: &str) {
        assert_eq!(format_min_sec(seconds), expected);
    }

    #[test]
    fn test_format_parse_round_trip_with_offset() {
        let shifted = parse_min_sec("00:10.000").unwrap() + 1800.0;
        assert_eq!(format_min_sec(shifted), "30:10.000");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(5), "0:00:05");
        assert_eq!(format_clock(3661), "1:01:01");
    }
}
