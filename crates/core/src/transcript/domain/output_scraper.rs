//! Incremental parser over the transcription tool's verbose console output.
//!
//! The tool interleaves a progress bar and bracketed transcript lines on
//! stdout/stderr. Text arrives in arbitrary slices; a line is handled only
//! once its newline shows up, so events are identical however the input is
//! split. Lines matching neither pattern are console chatter and dropped.

use regex::Regex;

use super::engine::{ProgressEvent, TranscriptSink};

pub struct OutputScraper {
    /// Everything seen so far, kept for error reporting.
    captured: String,
    /// Trailing fragment of the last slice, not yet newline-terminated.
    pending: String,
    progress_re: Regex,
    progress_time_re: Regex,
    segment_re: Regex,
}

impl OutputScraper {
    pub fn new() -> Self {
        Self {
            captured: String::new(),
            pending: String::new(),
            progress_re: Regex::new(r"(\d+)%\s*\|[^|]*\|\s*(\d+)/(\d+)").unwrap(),
            progress_time_re: Regex::new(r"\[(\d+:\d+)<(\d+:\d+),").unwrap(),
            segment_re: Regex::new(r"\[(\d{2}:\d{2}\.\d{3}) --> (\d{2}:\d{2}\.\d{3})\]\s*(.*)")
                .unwrap(),
        }
    }

    /// Feed one slice of console output, dispatching events for every line
    /// completed by it.
    pub fn write(&mut self, text: &str, sink: &mut dyn TranscriptSink) {
        self.captured.push_str(text);
        self.pending.push_str(text);

        // Process complete lines; keep the unterminated tail for next time.
        while let Some(newline) = self.pending.find('\n') {
            let line: String = self.pending.drain(..=newline).collect();
            self.process_line(line.trim_end_matches('\n'), sink);
        }
    }

    /// Flush the trailing unterminated fragment as if a newline arrived.
    pub fn finish(&mut self, sink: &mut dyn TranscriptSink) {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.process_line(&line, sink);
        }
    }

    pub fn captured(&self) -> &str {
        &self.captured
    }

    fn process_line(&self, line: &str, sink: &mut dyn TranscriptSink) {
        if let Some(caps) = self.progress_re.captures(line) {
            let percent = caps[1].parse().unwrap_or(0);
            let current = caps[2].parse().unwrap_or(0);
            let total = caps[3].parse().unwrap_or(0);

            let (elapsed, remaining) = match self.progress_time_re.captures(line) {
                Some(times) => (times[1].to_string(), times[2].to_string()),
                None => (String::new(), String::new()),
            };

            sink.on_progress(&ProgressEvent {
                percent,
                current,
                total,
                elapsed,
                remaining,
            });
        }

        for caps in self.segment_re.captures_iter(line) {
            let start = &caps[1];
            let end = &caps[2];
            let text = caps[3].trim();

            if let Some(end_seconds) = crate::shared::timestamp::parse_min_sec(end) {
                sink.on_segment_boundary(end_seconds);
            }
            if !text.is_empty() {
                sink.on_line(start, end, text);
            }
        }
    }
}

impl Default for OutputScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    /// Sink that records every event it receives, in order.
    #[derive(Default)]
    struct RecordingSink {
        progress: Vec<ProgressEvent>,
        boundaries: Vec<f64>,
        lines: Vec<(String, String, String)>,
    }

    impl TranscriptSink for RecordingSink {
        fn on_progress(&mut self, event: &ProgressEvent) {
            self.progress.push(event.clone());
        }

        fn on_segment_boundary(&mut self, end_seconds: f64) {
            self.boundaries.push(end_seconds);
        }

        fn on_line(&mut self, start: &str, end: &str, text: &str) {
            self.lines
                .push((start.to_string(), end.to_string(), text.to_string()));
        }
    }

    fn feed(text: &str, slice_len: usize) -> RecordingSink {
        let mut scraper = OutputScraper::new();
        let mut sink = RecordingSink::default();
        let chars: Vec<char> = text.chars().collect();
        for slice in chars.chunks(slice_len) {
            let s: String = slice.iter().collect();
            scraper.write(&s, &mut sink);
        }
        sink
    }

    #[test]
    fn test_progress_line_with_times() {
        let sink = feed(" 45%|████▌     | 90/200 [01:30<01:50,\n", 1000);
        assert_eq!(
            sink.progress,
            vec![ProgressEvent {
                percent: 45,
                current: 90,
                total: 200,
                elapsed: "01:30".to_string(),
                remaining: "01:50".to_string(),
            }]
        );
    }

    #[test]
    fn test_progress_line_without_times() {
        let sink = feed("12%|███       | 24/200\n", 1000);
        assert_eq!(sink.progress.len(), 1);
        assert_eq!(sink.progress[0].percent, 12);
        assert!(sink.progress[0].elapsed.is_empty());
        assert!(sink.progress[0].remaining.is_empty());
    }

    #[test]
    fn test_segment_line() {
        let sink = feed("[00:01.500 --> 00:03.250] Hello world\n", 1000);
        assert_eq!(sink.boundaries.len(), 1);
        assert_relative_eq!(sink.boundaries[0], 3.25, epsilon = 1e-9);
        assert_eq!(
            sink.lines,
            vec![(
                "00:01.500".to_string(),
                "00:03.250".to_string(),
                "Hello world".to_string()
            )]
        );
    }

    #[test]
    fn test_segment_with_empty_text_emits_boundary_only() {
        let sink = feed("[00:01.500 --> 00:03.250]   \n", 1000);
        assert_eq!(sink.boundaries.len(), 1);
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn test_unmatched_chatter_dropped() {
        let sink = feed("Detecting language using up to the first 30 seconds.\n", 1000);
        assert!(sink.progress.is_empty());
        assert!(sink.boundaries.is_empty());
        assert!(sink.lines.is_empty());
    }

    /// Events must not depend on how the input is sliced, including slices
    /// that split a line right before its newline.
    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(7)]
    #[case(64)]
    fn test_chunk_boundary_invariance(#[case] slice_len: usize) {
        let text = " 45%|████▌     | 90/200 [01:30<01:50,\n\
                    [00:01.500 --> 00:03.250] Hello world\n\
                    random chatter line\n\
                    [00:03.250 --> 00:05.000] Second line\n\
                    100%|██████████| 200/200 [03:20<00:00,\n";
        let whole = feed(text, usize::MAX);
        let sliced = feed(text, slice_len);
        assert_eq!(sliced.progress, whole.progress);
        assert_eq!(sliced.boundaries, whole.boundaries);
        assert_eq!(sliced.lines, whole.lines);
    }

    #[test]
    fn test_line_spanning_two_writes() {
        let mut scraper = OutputScraper::new();
        let mut sink = RecordingSink::default();
        scraper.write("[00:01.500 --> 00:0", &mut sink);
        assert!(sink.lines.is_empty());
        scraper.write("3.250] Hello world\n", &mut sink);
        assert_eq!(sink.lines.len(), 1);
        assert_eq!(sink.lines[0].2, "Hello world");
    }

    #[test]
    fn test_lines_processed_exactly_once_in_order() {
        let mut scraper = OutputScraper::new();
        let mut sink = RecordingSink::default();
        scraper.write("[00:00.000 --> 00:01.000] one\n[00:01.0", &mut sink);
        scraper.write("00 --> 00:02.000] two\n", &mut sink);
        let texts: Vec<&str> = sink.lines.iter().map(|(_, _, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_finish_flushes_trailing_fragment() {
        let mut scraper = OutputScraper::new();
        let mut sink = RecordingSink::default();
        scraper.write("[00:01.500 --> 00:03.250] no trailing newline", &mut sink);
        assert!(sink.lines.is_empty());
        scraper.finish(&mut sink);
        assert_eq!(sink.lines.len(), 1);
    }

    #[test]
    fn test_captured_keeps_everything() {
        let mut scraper = OutputScraper::new();
        let mut sink = RecordingSink::default();
        scraper.write("abc\n", &mut sink);
        scraper.write("def", &mut sink);
        assert_eq!(scraper.captured(), "abc\ndef");
    }
}
