use std::path::Path;

use crate::media::domain::audio_reader::AudioReader;
use crate::shared::constants::{CHUNK_SAMPLES, SAMPLE_RATE};
use crate::shared::timestamp::{format_min_sec, parse_min_sec};
use crate::transcript::domain::decode_options::DecodeOptions;
use crate::transcript::domain::download_policy::DownloadPolicy;
use crate::transcript::domain::engine::{
    ModelReadiness, ProgressEvent, TranscriptSink, TranscriptionEngine,
};
use crate::transcript::domain::segment::TranscriptionSegment;

/// How a transcription run ended.
#[derive(Debug)]
pub enum TranscribeOutcome {
    Completed(Vec<TranscriptionSegment>),
    /// The user declined the model download; nothing was transcribed.
    DownloadDeclined,
}

/// Chunked transcription driver.
///
/// Splits the decoded waveform into fixed-length chunks, runs the engine on
/// each chunk sequentially and shifts every chunk-relative timestamp by the
/// accumulated offset so the final list is globally monotonic. Live line
/// events are shifted the same way before they reach the caller's sink.
pub struct TranscribeAudioUseCase {
    reader: Box<dyn AudioReader>,
    engine: Box<dyn TranscriptionEngine>,
    chunk_samples: usize,
}

impl TranscribeAudioUseCase {
    pub fn new(reader: Box<dyn AudioReader>, engine: Box<dyn TranscriptionEngine>) -> Self {
        Self {
            reader,
            engine,
            chunk_samples: CHUNK_SAMPLES,
        }
    }

    pub fn with_chunk_samples(mut self, chunk_samples: usize) -> Self {
        self.chunk_samples = chunk_samples;
        self
    }

    pub fn execute(
        &mut self,
        input: &Path,
        options: &DecodeOptions,
        policy: &dyn DownloadPolicy,
        sink: &mut dyn TranscriptSink,
    ) -> Result<TranscribeOutcome, Box<dyn std::error::Error>> {
        if let ModelReadiness::Declined = self.engine.prepare(policy, sink)? {
            return Ok(TranscribeOutcome::DownloadDeclined);
        }

        let waveform = self.reader.load(input, SAMPLE_RATE)?;
        if waveform.is_empty() {
            return Ok(TranscribeOutcome::Completed(Vec::new()));
        }

        let rate = waveform.sample_rate() as f64;
        let mut segments = Vec::new();

        for (index, chunk) in waveform.samples().chunks(self.chunk_samples).enumerate() {
            let offset = index as f64 * self.chunk_samples as f64 / rate;
            log::debug!(
                "transcribing chunk {index} ({} samples, offset {offset:.1}s)",
                chunk.len()
            );

            let mut offset_sink = OffsetSink {
                inner: &mut *sink,
                offset,
            };
            let chunk_segments = self.engine.transcribe_chunk(chunk, options, &mut offset_sink)?;

            for segment in chunk_segments {
                segments.push(TranscriptionSegment {
                    start: segment.start + offset,
                    end: segment.end + offset,
                    text: segment.text.trim().to_string(),
                });
            }
        }

        Ok(TranscribeOutcome::Completed(segments))
    }
}

/// Shifts live transcript-line timestamps into file time; every other event
/// passes through unchanged.
struct OffsetSink<'a> {
    inner: &'a mut dyn TranscriptSink,
    offset: f64,
}

impl TranscriptSink for OffsetSink<'_> {
    fn on_status(&mut self, message: &str) {
        self.inner.on_status(message);
    }

    fn on_download_progress(&mut self, downloaded: u64, total: u64) {
        self.inner.on_download_progress(downloaded, total);
    }

    fn on_progress(&mut self, event: &ProgressEvent) {
        self.inner.on_progress(event);
    }

    fn on_segment_boundary(&mut self, end_seconds: f64) {
        self.inner.on_segment_boundary(end_seconds);
    }

    fn on_line(&mut self, start: &str, end: &str, text: &str) {
        match (parse_min_sec(start), parse_min_sec(end)) {
            (Some(s), Some(e)) => self.inner.on_line(
                &format_min_sec(s + self.offset),
                &format_min_sec(e + self.offset),
                text,
            ),
            // Malformed timestamps pass through untouched
            _ => self.inner.on_line(start, end, text),
        }
    }
}
