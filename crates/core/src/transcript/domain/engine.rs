use super::decode_options::DecodeOptions;
use super::download_policy::DownloadPolicy;
use super::segment::TranscriptionSegment;

/// Structured progress extracted from the model's console output.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent {
    pub percent: u32,
    pub current: u64,
    pub total: u64,
    pub elapsed: String,
    pub remaining: String,
}

/// Receiver for live transcription events.
///
/// All methods default to no-ops so implementations subscribe only to what
/// they display.
pub trait TranscriptSink {
    /// Human-readable status line (model loading, downloading, ...).
    fn on_status(&mut self, _message: &str) {}

    /// Model download progress; `total` is 0 when unknown.
    fn on_download_progress(&mut self, _downloaded: u64, _total: u64) {}

    /// Decode progress parsed from the model's progress bar.
    fn on_progress(&mut self, _event: &ProgressEvent) {}

    /// A segment finished decoding; value is its end time in seconds,
    /// relative to the current chunk.
    fn on_segment_boundary(&mut self, _end_seconds: f64) {}

    /// A new transcript line with its raw `mm:ss.mmm` timestamps.
    fn on_line(&mut self, _start: &str, _end: &str, _text: &str) {}
}

/// Sink that discards every event.
pub struct NullSink;

impl TranscriptSink for NullSink {}

/// Whether the model is ready after [`TranscriptionEngine::prepare`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelReadiness {
    Ready,
    /// The user declined the model download; the run must abort cleanly.
    Declined,
}

/// Seam over the external transcription model.
///
/// Implementations transcribe one chunk of 16 kHz mono audio at a time and
/// report live events through the sink. Returned segment timestamps are
/// chunk-relative; the driver shifts them into file time.
pub trait TranscriptionEngine: Send {
    fn name(&self) -> &'static str;

    /// Make the model available, asking `policy` before any download.
    fn prepare(
        &mut self,
        policy: &dyn DownloadPolicy,
        sink: &mut dyn TranscriptSink,
    ) -> Result<ModelReadiness, Box<dyn std::error::Error>>;

    fn transcribe_chunk(
        &mut self,
        chunk: &[f32],
        options: &DecodeOptions,
        sink: &mut dyn TranscriptSink,
    ) -> Result<Vec<TranscriptionSegment>, Box<dyn std::error::Error>>;
}
