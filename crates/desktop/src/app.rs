use std::path::PathBuf;
use std::time::{Duration, Instant};

use iced::widget::{button, column, container, row, text};
use iced::{Element, Length, Subscription, Task, Theme};

use voxtitle_core::export::{json, srt, text as text_export, vtt, ExportMeta};
use voxtitle_core::install::domain::install_record::InstallVersion;
use voxtitle_core::media::domain::audio_reader::AudioReader;
use voxtitle_core::media::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use voxtitle_core::shared::constants::{AUDIO_EXTENSIONS, SAMPLE_RATE};
use voxtitle_core::shared::runtime_env::RuntimeEnv;
use voxtitle_core::shared::timestamp::format_clock;
use voxtitle_core::transcript::domain::initial_prompt;
use voxtitle_core::transcript::domain::model_size::ModelSize;
use voxtitle_core::transcript::domain::segment::TranscriptionSegment;
use voxtitle_core::transcript::infrastructure::engine_factory;

use crate::settings::{Appearance, Settings};
use crate::theme;
use crate::workers::install_worker::{self, InstallEvent};
use crate::workers::transcribe_worker::{self, TranscribeParams, WorkerEvent};
use crate::{dialogs, tabs};

// ---------------------------------------------------------------------------
// Tab enum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Transcribe,
    Parameters,
    Install,
}

impl Tab {
    const ALL: &[Tab] = &[Tab::Transcribe, Tab::Parameters, Tab::Install];

    fn label(self) -> &'static str {
        match self {
            Tab::Transcribe => "Transcribe",
            Tab::Parameters => "Parameters",
            Tab::Install => "Install",
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    // Transcribe tab
    SelectAudioFile,
    AudioFileSelected(Option<PathBuf>),
    ModelChanged(ModelSize),
    LanguageChanged(&'static str),
    KeywordChanged(String),
    StartTranscription,
    ClearOutput,
    SaveTranscription,
    TranscriptionTargetPicked(Option<PathBuf>),
    SaveSubtitle,
    SubtitleTargetPicked(Option<PathBuf>),
    // Parameters tab
    TemperatureChanged(String),
    BestOfChanged(String),
    BeamSizeChanged(String),
    LogprobChanged(String),
    NoSpeechChanged(String),
    ConditionToggled(bool),
    ApplyParameters,
    RestoreDefaultParameters,
    AppearanceChanged(Appearance),
    // Install tab
    InstallVersionChanged(InstallVersion),
    StartInstall,
    StartVerify,
    RecheckRuntime,
    OpenRuntimeDir,
    // Timers
    PollWorkers,
    Tick,
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    active_tab: Tab,
    pub settings: Settings,
    pub env: RuntimeEnv,
    pub runtime_available: bool,

    // Transcribe state
    pub current_file: Option<PathBuf>,
    pub audio_duration: f64,
    pub keyword: String,
    pub status_log: Vec<String>,
    pub transcript_log: Vec<String>,
    pub status_line: String,
    pub progress: Option<f32>,
    pub elapsed: String,
    pub device: &'static str,
    pub results: Vec<TranscriptionSegment>,
    pub is_transcribing: bool,
    started_at: Option<Instant>,
    transcribe_rx: Option<crossbeam_channel::Receiver<WorkerEvent>>,

    // Install state
    pub install_version: InstallVersion,
    pub install_log: Vec<String>,
    pub is_installing: bool,
    install_rx: Option<crossbeam_channel::Receiver<InstallEvent>>,

    // Parameter input buffers (applied on "Apply")
    pub temperature_input: String,
    pub best_of_input: String,
    pub beam_size_input: String,
    pub logprob_input: String,
    pub no_speech_input: String,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let settings = Settings::load();
        let env = RuntimeEnv::discover();
        let runtime_available = env.is_runtime_installed();

        let app = Self {
            active_tab: Tab::Transcribe,
            temperature_input: settings.temperature.to_string(),
            best_of_input: settings.best_of.to_string(),
            beam_size_input: settings.beam_size.to_string(),
            logprob_input: settings.logprob_threshold.to_string(),
            no_speech_input: settings.no_speech_threshold.to_string(),
            settings,
            env,
            runtime_available,
            current_file: None,
            audio_duration: 0.0,
            keyword: String::new(),
            status_log: Vec::new(),
            transcript_log: Vec::new(),
            status_line: "Waiting to Start".to_string(),
            progress: None,
            elapsed: "0:00:00".to_string(),
            device: "cpu",
            results: Vec::new(),
            is_transcribing: false,
            started_at: None,
            transcribe_rx: None,
            install_version: InstallVersion::Cpu,
            install_log: Vec::new(),
            is_installing: false,
            install_rx: None,
        };
        (app, Task::none())
    }

    fn busy(&self) -> bool {
        self.is_transcribing || self.is_installing
    }

    fn append_status(&mut self, message: &str) {
        self.status_log.push(message.to_string());
    }

    fn append_install_log(&mut self, message: &str) {
        let now = chrono::Local::now().format("%H:%M:%S");
        self.install_log.push(format!("[{now}] {message}"));
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.active_tab = tab;
            }

            // ─── Transcribe tab ───
            Message::SelectAudioFile => {
                return Task::perform(
                    async {
                        rfd::AsyncFileDialog::new()
                            .set_title("Select Audio File")
                            .add_filter("Audio files", AUDIO_EXTENSIONS)
                            .pick_file()
                            .await
                            .map(|h| h.path().to_path_buf())
                    },
                    Message::AudioFileSelected,
                );
            }
            Message::AudioFileSelected(Some(path)) => {
                self.select_file(path);
            }
            Message::AudioFileSelected(None) => {}
            Message::ModelChanged(model) => {
                self.settings.model = model;
                self.settings.save();
            }
            Message::LanguageChanged(language) => {
                self.settings.language = language.to_string();
                self.settings.save();
            }
            Message::KeywordChanged(keyword) => {
                self.keyword = keyword;
            }
            Message::StartTranscription => {
                self.start_transcription();
            }
            Message::ClearOutput => {
                self.transcript_log.clear();
                self.status_log.clear();
            }
            Message::SaveTranscription => {
                if self.results.is_empty() {
                    dialogs::warning("Warning", "No transcription results to save");
                } else {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .set_title("Save As")
                                .set_file_name("transcription.json")
                                .add_filter("JSON files", &["json"])
                                .add_filter("Text files", &["txt"])
                                .save_file()
                                .await
                                .map(|h| h.path().to_path_buf())
                        },
                        Message::TranscriptionTargetPicked,
                    );
                }
            }
            Message::TranscriptionTargetPicked(Some(path)) => {
                self.export_transcription(&path);
            }
            Message::TranscriptionTargetPicked(None) => {}
            Message::SaveSubtitle => {
                if self.results.is_empty() {
                    dialogs::warning("Warning", "No subtitles to save");
                } else {
                    return Task::perform(
                        async {
                            rfd::AsyncFileDialog::new()
                                .set_title("Save As")
                                .set_file_name("subtitles.srt")
                                .add_filter("SRT files", &["srt"])
                                .add_filter("VTT files", &["vtt"])
                                .save_file()
                                .await
                                .map(|h| h.path().to_path_buf())
                        },
                        Message::SubtitleTargetPicked,
                    );
                }
            }
            Message::SubtitleTargetPicked(Some(path)) => {
                self.export_subtitle(&path);
            }
            Message::SubtitleTargetPicked(None) => {}

            // ─── Parameters tab ───
            Message::TemperatureChanged(v) => self.temperature_input = v,
            Message::BestOfChanged(v) => self.best_of_input = v,
            Message::BeamSizeChanged(v) => self.beam_size_input = v,
            Message::LogprobChanged(v) => self.logprob_input = v,
            Message::NoSpeechChanged(v) => self.no_speech_input = v,
            Message::ConditionToggled(value) => {
                self.settings.condition_on_previous_text = value;
                self.settings.save();
            }
            Message::ApplyParameters => {
                self.apply_parameters();
            }
            Message::RestoreDefaultParameters => {
                let defaults = Settings::default();
                self.settings.temperature = defaults.temperature;
                self.settings.best_of = defaults.best_of;
                self.settings.beam_size = defaults.beam_size;
                self.settings.logprob_threshold = defaults.logprob_threshold;
                self.settings.no_speech_threshold = defaults.no_speech_threshold;
                self.settings.condition_on_previous_text = defaults.condition_on_previous_text;
                self.settings.save();
                self.temperature_input = self.settings.temperature.to_string();
                self.best_of_input = self.settings.best_of.to_string();
                self.beam_size_input = self.settings.beam_size.to_string();
                self.logprob_input = self.settings.logprob_threshold.to_string();
                self.no_speech_input = self.settings.no_speech_threshold.to_string();
            }
            Message::AppearanceChanged(appearance) => {
                self.settings.appearance = appearance;
                self.settings.save();
            }

            // ─── Install tab ───
            Message::InstallVersionChanged(version) => {
                self.install_version = version;
            }
            Message::StartInstall => {
                self.start_install();
            }
            Message::StartVerify => {
                self.start_verify();
            }
            Message::RecheckRuntime => {
                self.runtime_available = self.env.is_runtime_installed();
                let message = if self.runtime_available {
                    "Runtime detected"
                } else {
                    "Runtime still not installed"
                };
                self.append_install_log(message);
            }
            Message::OpenRuntimeDir => {
                let _ = open::that(&self.env.lib_dir);
            }

            // ─── Timers ───
            Message::PollWorkers => {
                self.poll_workers();
            }
            Message::Tick => {
                if let Some(started_at) = self.started_at {
                    self.elapsed = format_clock(started_at.elapsed().as_secs());
                }
            }
        }
        Task::none()
    }

    fn select_file(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        self.transcript_log.clear();
        self.results.clear();

        match FfmpegAudioReader.load(&path, SAMPLE_RATE) {
            Ok(waveform) => {
                self.audio_duration = waveform.duration();
                let duration = format_clock(self.audio_duration as u64);
                let estimate = format_clock(
                    (self.audio_duration * self.settings.model.speed_factor()) as u64,
                );
                self.append_status(&format!(
                    "Audio file selected: {name} (Duration: {duration}, Estimated time: {estimate})"
                ));
            }
            Err(e) => {
                self.audio_duration = 0.0;
                self.append_status(&format!("Unable to get audio duration: {e}"));
                dialogs::error("Error", &format!("Unable to get audio duration: {e}"));
            }
        }
        self.current_file = Some(path);
    }

    fn start_transcription(&mut self) {
        if self.busy() {
            dialogs::warning("Warning", "An operation is already running");
            return;
        }
        let Some(input) = self.current_file.clone() else {
            dialogs::warning("Warning", "Please select an audio file");
            return;
        };
        if engine_factory::requires_installed_runtime() && !self.runtime_available {
            dialogs::error(
                "Error",
                "Runtime not installed, please run the installer first",
            );
            return;
        }

        self.results.clear();
        self.transcript_log.clear();
        self.progress = None;
        self.elapsed = "0:00:00".to_string();
        self.status_line = "Preparing...".to_string();
        self.append_status("Starting audio transcription...");

        let mut options = self.settings.decode_options();
        options.initial_prompt = initial_prompt::build(options.language.as_deref(), &self.keyword);

        self.started_at = Some(Instant::now());
        self.is_transcribing = true;
        self.transcribe_rx = Some(transcribe_worker::spawn(TranscribeParams {
            input,
            env: self.env.clone(),
            model: self.settings.model,
            options,
        }));
    }

    fn start_install(&mut self) {
        if self.busy() {
            dialogs::warning("Warning", "An operation is already running");
            return;
        }
        let prompt = format!(
            "Install the {} runtime into {}?",
            self.install_version,
            self.env.lib_dir.display()
        );
        if !dialogs::confirm("Confirm", &prompt) {
            return;
        }

        self.install_log.clear();
        self.is_installing = true;
        self.install_rx = Some(install_worker::spawn_install(
            self.install_version,
            self.env.clone(),
        ));
    }

    fn start_verify(&mut self) {
        if self.busy() {
            dialogs::warning("Warning", "An operation is already running");
            return;
        }
        self.is_installing = true;
        self.install_rx = Some(install_worker::spawn_verify(self.env.clone()));
    }

    fn poll_workers(&mut self) {
        let mut transcribe_events = Vec::new();
        if let Some(ref rx) = self.transcribe_rx {
            while let Ok(event) = rx.try_recv() {
                transcribe_events.push(event);
            }
        }
        for event in transcribe_events {
            self.handle_transcribe_event(event);
        }

        let mut install_events = Vec::new();
        if let Some(ref rx) = self.install_rx {
            while let Ok(event) = rx.try_recv() {
                install_events.push(event);
            }
        }
        for event in install_events {
            self.handle_install_event(event);
        }
    }

    fn handle_transcribe_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Status(message) => {
                self.status_line = message.clone();
                self.append_status(&message);
            }
            WorkerEvent::Line { start, end, text } => {
                self.transcript_log.push(format!("[{start} --> {end}] {text}"));
            }
            WorkerEvent::Progress(progress) => {
                self.progress = Some(progress.percent as f32);
                if !progress.elapsed.is_empty() {
                    self.elapsed = progress.elapsed;
                }
            }
            WorkerEvent::SegmentBoundary(end_seconds) => {
                if self.audio_duration > 0.0 {
                    let pct = (end_seconds / self.audio_duration * 100.0).min(100.0);
                    self.progress = Some(pct as f32);
                }
            }
            WorkerEvent::DownloadProgress(downloaded, total) => {
                self.status_line = if total > 0 {
                    let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
                    format!("Downloading model \u{2014} {pct}%")
                } else {
                    format!("Downloading model\u{2026} {downloaded} bytes")
                };
            }
            WorkerEvent::ConfirmDownload { model, reply } => {
                let answer = dialogs::confirm(
                    "Download Model?",
                    &format!(
                        "{} model ({}) not found. Download now?",
                        model,
                        model.download_size()
                    ),
                );
                let _ = reply.send(answer);
            }
            WorkerEvent::Finished(segments) => {
                if let Some(started_at) = self.started_at {
                    self.elapsed = format_clock(started_at.elapsed().as_secs());
                }
                self.append_status(&format!(
                    "Transcription complete! Segments: {}, Processing time: {}",
                    segments.len(),
                    self.elapsed
                ));
                self.status_line = "Transcription completed".to_string();
                self.progress = Some(100.0);
                self.results = segments;
                self.finish_transcription();
                dialogs::info("Success", "Transcription completed successfully");
            }
            WorkerEvent::Declined => {
                self.append_status("Model download cancelled");
                self.status_line = "Model download cancelled".to_string();
                self.finish_transcription();
            }
            WorkerEvent::Failed(error) => {
                log::error!("transcription failed: {error}");
                self.append_status(&format!("Transcription error: {error}"));
                self.status_line = "Error".to_string();
                self.progress = None;
                self.finish_transcription();
                dialogs::error("Error", &format!("Transcription error: {error}"));
            }
        }
    }

    fn finish_transcription(&mut self) {
        self.is_transcribing = false;
        self.started_at = None;
        self.transcribe_rx = None;
    }

    fn handle_install_event(&mut self, event: InstallEvent) {
        match event {
            InstallEvent::Log(line) => {
                self.append_install_log(&line);
            }
            InstallEvent::Installed(record) => {
                self.append_install_log(&format!(
                    "Installation complete (version: {}, platform: {})",
                    record.version, record.platform
                ));
                self.is_installing = false;
                self.install_rx = None;
                self.runtime_available = self.env.is_runtime_installed();
                dialogs::info("Complete", "All dependencies installed successfully!");
            }
            InstallEvent::Verified(report) => {
                self.device = if report.cuda_available { "cuda" } else { "cpu" };
                self.runtime_available = true;
                self.is_installing = false;
                self.install_rx = None;
                dialogs::info(
                    "Verification Successful",
                    &format!(
                        "Torch {} (CUDA: {})\n{}",
                        report.runtime_version, report.cuda_available, report.ffmpeg_version
                    ),
                );
            }
            InstallEvent::Failed(error) => {
                log::error!("install worker failed: {error}");
                self.append_install_log(&format!("Error: {error}"));
                self.is_installing = false;
                self.install_rx = None;
                dialogs::error("Error", &error);
            }
        }
    }

    fn export_meta(&self) -> ExportMeta {
        ExportMeta {
            source_file: self
                .current_file
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            keyword: self.keyword.trim().to_string(),
            language: self.settings.language.clone(),
            model: self.settings.model.to_string(),
            device: self.device.to_string(),
        }
    }

    fn export_transcription(&mut self, path: &std::path::Path) {
        let result = if path.extension().is_some_and(|e| e == "json") {
            json::write_json(path, &self.export_meta(), &self.results)
        } else {
            text_export::write_text(path, &self.export_meta(), &self.results)
        };
        self.report_export(path, result, "Transcription results saved");
    }

    fn export_subtitle(&mut self, path: &std::path::Path) {
        let result = if path.extension().is_some_and(|e| e == "vtt") {
            vtt::write_vtt(path, &self.results)
        } else {
            srt::write_srt(path, &self.results)
        };
        self.report_export(path, result, "Subtitle file saved");
    }

    fn report_export(
        &mut self,
        path: &std::path::Path,
        result: std::io::Result<()>,
        success_message: &str,
    ) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        match result {
            Ok(()) => {
                self.append_status(&format!("{success_message}: {name}"));
                dialogs::info("Success", &format!("{success_message}: {name}"));
            }
            Err(e) => {
                dialogs::error("Error", &format!("Save error: {e}"));
            }
        }
    }

    fn apply_parameters(&mut self) {
        let parsed = (
            self.temperature_input.trim().parse::<f64>(),
            self.best_of_input.trim().parse::<u32>(),
            self.beam_size_input.trim().parse::<u32>(),
            self.logprob_input.trim().parse::<f64>(),
            self.no_speech_input.trim().parse::<f64>(),
        );
        match parsed {
            (Ok(temperature), Ok(best_of), Ok(beam_size), Ok(logprob), Ok(no_speech)) => {
                self.settings.temperature = temperature.max(0.0);
                self.settings.best_of = best_of.max(1);
                self.settings.beam_size = beam_size.max(1);
                self.settings.logprob_threshold = logprob;
                self.settings.no_speech_threshold = no_speech.clamp(0.0, 1.0);
                self.settings.save();
                self.append_status(&format!(
                    "Parameters updated: temperature={}, best_of={}, beam_size={}",
                    self.settings.temperature, self.settings.best_of, self.settings.beam_size
                ));
            }
            _ => {
                dialogs::error("Error", "Invalid parameter value");
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        // Tab bar
        let tab_bar = row(Tab::ALL
            .iter()
            .map(|&tab| {
                let label = text(tab.label()).size(13);
                let btn = button(label)
                    .on_press(Message::TabSelected(tab))
                    .padding([6, 14]);
                if tab == self.active_tab {
                    btn.style(button::primary).into()
                } else {
                    btn.style(button::text).into()
                }
            })
            .collect::<Vec<_>>())
        .spacing(2);

        let content: Element<'_, Message> = match self.active_tab {
            Tab::Transcribe => tabs::transcribe_tab::view(self),
            Tab::Parameters => tabs::parameters_tab::view(self),
            Tab::Install => tabs::install_tab::view(self),
        };

        let tab_content = container(content).padding(16).height(Length::Fill);

        let footer = container(
            text(if self.runtime_available {
                "Runtime: installed"
            } else {
                "Runtime: not installed \u{2014} see the Install tab"
            })
            .size(11),
        )
        .width(Length::Fill)
        .center_x(Length::Fill)
        .padding([4, 0]);

        column![tab_bar, tab_content, footer]
            .spacing(0)
            .height(Length::Fill)
            .into()
    }

    pub fn theme(&self) -> Theme {
        theme::resolve_theme(self.settings.appearance)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        let mut subscriptions = Vec::new();
        if self.transcribe_rx.is_some() || self.install_rx.is_some() {
            subscriptions
                .push(iced::time::every(Duration::from_millis(100)).map(|_| Message::PollWorkers));
        }
        if self.is_transcribing {
            subscriptions.push(iced::time::every(Duration::from_secs(1)).map(|_| Message::Tick));
        }
        Subscription::batch(subscriptions)
    }
}
