use std::path::PathBuf;
use std::thread;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use voxtitle_core::media::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use voxtitle_core::pipeline::transcribe_audio_use_case::{
    TranscribeAudioUseCase, TranscribeOutcome,
};
use voxtitle_core::shared::runtime_env::RuntimeEnv;
use voxtitle_core::transcript::domain::decode_options::DecodeOptions;
use voxtitle_core::transcript::domain::download_policy::DownloadPolicy;
use voxtitle_core::transcript::domain::engine::{ProgressEvent, TranscriptSink};
use voxtitle_core::transcript::domain::model_size::ModelSize;
use voxtitle_core::transcript::domain::segment::TranscriptionSegment;
use voxtitle_core::transcript::infrastructure::engine_factory;

/// Messages sent from the transcription worker to the UI.
pub enum WorkerEvent {
    Status(String),
    Line {
        start: String,
        end: String,
        text: String,
    },
    Progress(ProgressEvent),
    SegmentBoundary(f64),
    DownloadProgress(u64, u64),
    /// Blocking confirmation request. The worker is parked on the paired
    /// receiver; exactly one answer must be sent.
    ConfirmDownload {
        model: ModelSize,
        reply: Sender<bool>,
    },
    Finished(Vec<TranscriptionSegment>),
    Declined,
    Failed(String),
}

/// Parameters for a transcription job.
pub struct TranscribeParams {
    pub input: PathBuf,
    pub env: RuntimeEnv,
    pub model: ModelSize,
    pub options: DecodeOptions,
}

/// Spawn the background transcription worker; events arrive on the
/// returned channel.
pub fn spawn(params: TranscribeParams) -> Receiver<WorkerEvent> {
    let (tx, rx) = unbounded::<WorkerEvent>();

    thread::spawn(move || {
        let event = match run(&tx, params) {
            Ok(Some(segments)) => WorkerEvent::Finished(segments),
            Ok(None) => WorkerEvent::Declined,
            Err(e) => WorkerEvent::Failed(e.to_string()),
        };
        let _ = tx.send(event);
    });

    rx
}

fn run(
    tx: &Sender<WorkerEvent>,
    params: TranscribeParams,
) -> Result<Option<Vec<TranscriptionSegment>>, Box<dyn std::error::Error>> {
    let engine = engine_factory::create_engine(&params.env, params.model);
    let mut use_case = TranscribeAudioUseCase::new(Box::new(FfmpegAudioReader), engine);

    let mut sink = ChannelSink { tx: tx.clone() };
    let policy = RendezvousPolicy { tx: tx.clone() };

    match use_case.execute(&params.input, &params.options, &policy, &mut sink)? {
        TranscribeOutcome::Completed(segments) => Ok(Some(segments)),
        TranscribeOutcome::DownloadDeclined => Ok(None),
    }
}

/// Forwards live transcription events onto the worker channel.
struct ChannelSink {
    tx: Sender<WorkerEvent>,
}

impl TranscriptSink for ChannelSink {
    fn on_status(&mut self, message: &str) {
        let _ = self.tx.send(WorkerEvent::Status(message.to_string()));
    }

    fn on_download_progress(&mut self, downloaded: u64, total: u64) {
        let _ = self
            .tx
            .send(WorkerEvent::DownloadProgress(downloaded, total));
    }

    fn on_progress(&mut self, event: &ProgressEvent) {
        let _ = self.tx.send(WorkerEvent::Progress(event.clone()));
    }

    fn on_segment_boundary(&mut self, end_seconds: f64) {
        let _ = self.tx.send(WorkerEvent::SegmentBoundary(end_seconds));
    }

    fn on_line(&mut self, start: &str, end: &str, text: &str) {
        let _ = self.tx.send(WorkerEvent::Line {
            start: start.to_string(),
            end: end.to_string(),
            text: text.to_string(),
        });
    }
}

/// Single-slot rendezvous with the UI thread: the request carries its own
/// reply sender, and the worker blocks until the dialog answer arrives.
struct RendezvousPolicy {
    tx: Sender<WorkerEvent>,
}

impl DownloadPolicy for RendezvousPolicy {
    fn confirm_download(&self, model: ModelSize) -> bool {
        let (reply_tx, reply_rx) = bounded::<bool>(1);
        if self
            .tx
            .send(WorkerEvent::ConfirmDownload {
                model,
                reply: reply_tx,
            })
            .is_err()
        {
            return false;
        }
        // A dropped reply sender (UI gone) reads as a decline.
        reply_rx.recv().unwrap_or(false)
    }
}
