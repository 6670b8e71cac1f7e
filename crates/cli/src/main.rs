use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use voxtitle_core::export::{json, srt, text as text_export, vtt, ExportMeta};
use voxtitle_core::install::domain::install_record::InstallVersion;
use voxtitle_core::install::infrastructure::pip_package_manager::PipPackageManager;
use voxtitle_core::media::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use voxtitle_core::pipeline::install_runtime_use_case::InstallRuntimeUseCase;
use voxtitle_core::pipeline::transcribe_audio_use_case::{
    TranscribeAudioUseCase, TranscribeOutcome,
};
use voxtitle_core::pipeline::verify_install_use_case::VerifyInstallUseCase;
use voxtitle_core::shared::runtime_env::{bundled_wheels_dir, RuntimeEnv};
use voxtitle_core::transcript::domain::decode_options::DecodeOptions;
use voxtitle_core::transcript::domain::download_policy::{AlwaysDownload, DownloadPolicy};
use voxtitle_core::transcript::domain::engine::{ProgressEvent, TranscriptSink};
use voxtitle_core::transcript::domain::initial_prompt;
use voxtitle_core::transcript::domain::model_size::ModelSize;
use voxtitle_core::transcript::domain::segment::TranscriptionSegment;
use voxtitle_core::transcript::infrastructure::engine_factory;

/// Audio transcription and subtitle export.
#[derive(Parser)]
#[command(name = "voxtitle")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe an audio file and export the result.
    Transcribe {
        /// Input audio file (wav/mp3/m4a/aac/ogg/flac).
        input: PathBuf,

        /// Output file (defaults to the input with the format's extension).
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Export format: srt, vtt, json or txt.
        #[arg(long, default_value = "srt")]
        format: String,

        /// Model size to transcribe with.
        #[arg(long, default_value = "small")]
        model: ModelSize,

        /// Language code, or "auto" to detect.
        #[arg(long, default_value = "auto")]
        language: String,

        /// Topic keyword used to build the initial prompt.
        #[arg(long)]
        keyword: Option<String>,

        #[arg(long, default_value = "0.0")]
        temperature: f64,

        #[arg(long, default_value = "10")]
        best_of: u32,

        #[arg(long, default_value = "10")]
        beam_size: u32,

        #[arg(long, default_value = "-1.0", allow_hyphen_values = true)]
        logprob_threshold: f64,

        #[arg(long, default_value = "0.5")]
        no_speech_threshold: f64,

        /// Condition decoding on previously decoded text.
        #[arg(long)]
        condition_on_previous_text: bool,

        /// Answer yes to the model download prompt.
        #[arg(long, short = 'y')]
        yes: bool,

        /// Runtime install directory (defaults to pytorch_libs next to the
        /// executable).
        #[arg(long)]
        target: Option<PathBuf>,

        /// Python interpreter running the transcription tool.
        #[arg(long)]
        python: Option<PathBuf>,
    },
    /// Install the numerical runtime and transcription library.
    Install {
        /// Install the CUDA-accelerated runtime instead of the CPU one.
        #[arg(long)]
        cuda: bool,

        #[arg(long)]
        target: Option<PathBuf>,

        #[arg(long)]
        python: Option<PathBuf>,
    },
    /// Verify an existing installation.
    Verify {
        #[arg(long)]
        target: Option<PathBuf>,

        #[arg(long)]
        python: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Transcribe {
            input,
            output,
            format,
            model,
            language,
            keyword,
            temperature,
            best_of,
            beam_size,
            logprob_threshold,
            no_speech_threshold,
            condition_on_previous_text,
            yes,
            target,
            python,
        } => {
            let env = resolve_env(target, python);
            let format = resolve_format(&format, output.as_deref())?;
            let output = output.unwrap_or_else(|| input.with_extension(format));
            validate_transcribe(&input)?;

            let language = (language != "auto").then_some(language);
            let options = DecodeOptions {
                initial_prompt: initial_prompt::build(
                    language.as_deref(),
                    keyword.as_deref().unwrap_or(""),
                ),
                language,
                temperature,
                best_of,
                beam_size,
                logprob_threshold,
                no_speech_threshold,
                condition_on_previous_text,
            };

            let policy: Box<dyn DownloadPolicy> = if yes {
                Box::new(AlwaysDownload)
            } else {
                Box::new(PromptPolicy)
            };

            run_transcribe(
                &env, &input, &output, format, model, &options, &*policy, keyword,
            )
        }
        Command::Install {
            cuda,
            target,
            python,
        } => {
            let env = resolve_env(target, python);
            let version = if cuda {
                InstallVersion::Cuda
            } else {
                InstallVersion::Cpu
            };
            run_install(&env, version)
        }
        Command::Verify { target, python } => {
            let env = resolve_env(target, python);
            run_verify(&env)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_transcribe(
    env: &RuntimeEnv,
    input: &Path,
    output: &Path,
    format: &'static str,
    model: ModelSize,
    options: &DecodeOptions,
    policy: &dyn DownloadPolicy,
    keyword: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = engine_factory::create_engine(env, model);
    let mut use_case = TranscribeAudioUseCase::new(Box::new(FfmpegAudioReader), engine);

    let mut sink = ConsoleSink { printed_bar: false };
    let outcome = use_case.execute(input, options, policy, &mut sink)?;
    sink.finish_bar();

    let segments = match outcome {
        TranscribeOutcome::Completed(segments) => segments,
        TranscribeOutcome::DownloadDeclined => {
            log::info!("Model download cancelled");
            return Ok(());
        }
    };

    let meta = ExportMeta {
        source_file: input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        keyword: keyword.unwrap_or_default(),
        language: options.language.clone().unwrap_or_else(|| "auto".to_string()),
        model: model.to_string(),
        device: "cpu".to_string(),
    };
    export(output, format, &meta, &segments)?;
    log::info!("{} segments written to {}", segments.len(), output.display());
    Ok(())
}

fn export(
    output: &Path,
    format: &str,
    meta: &ExportMeta,
    segments: &[TranscriptionSegment],
) -> std::io::Result<()> {
    match format {
        "vtt" => vtt::write_vtt(output, segments),
        "json" => json::write_json(output, meta, segments),
        "txt" => text_export::write_text(output, meta, segments),
        _ => srt::write_srt(output, segments),
    }
}

fn run_install(env: &RuntimeEnv, version: InstallVersion) -> Result<(), Box<dyn std::error::Error>> {
    let manager = PipPackageManager::new(env.python.clone());
    let use_case = InstallRuntimeUseCase::new(
        Box::new(manager),
        env.lib_dir.clone(),
        bundled_wheels_dir(),
    );
    let record = use_case.execute(version, &mut |line| eprintln!("{line}"))?;
    log::info!(
        "Installed {} runtime for {} into {}",
        record.version,
        record.platform,
        env.lib_dir.display()
    );
    Ok(())
}

fn run_verify(env: &RuntimeEnv) -> Result<(), Box<dyn std::error::Error>> {
    let use_case = VerifyInstallUseCase::new(env.python.clone(), env.lib_dir.clone());
    let report = use_case.execute(&mut |line| eprintln!("{line}"))?;
    println!(
        "Runtime {} (CUDA: {}) \u{2014} {}",
        report.runtime_version, report.cuda_available, report.ffmpeg_version
    );
    Ok(())
}

fn resolve_env(target: Option<PathBuf>, python: Option<PathBuf>) -> RuntimeEnv {
    let mut env = RuntimeEnv::discover();
    if let Some(target) = target {
        env.lib_dir = target;
    }
    if let Some(python) = python {
        env.python = python;
    }
    env
}

fn resolve_format(
    format: &str,
    output: Option<&Path>,
) -> Result<&'static str, Box<dyn std::error::Error>> {
    // An explicit output extension wins over --format.
    let chosen = output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .unwrap_or(format);
    match chosen {
        "srt" => Ok("srt"),
        "vtt" => Ok("vtt"),
        "json" => Ok("json"),
        "txt" => Ok("txt"),
        other => Err(format!("Unsupported format '{other}' (use srt, vtt, json or txt)").into()),
    }
}

fn validate_transcribe(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("Input file not found: {}", input.display()).into());
    }
    Ok(())
}

/// Prints live transcript lines to stdout and progress to stderr.
struct ConsoleSink {
    printed_bar: bool,
}

impl ConsoleSink {
    fn finish_bar(&mut self) {
        if self.printed_bar {
            eprintln!();
            self.printed_bar = false;
        }
    }
}

impl TranscriptSink for ConsoleSink {
    fn on_status(&mut self, message: &str) {
        self.finish_bar();
        eprintln!("{message}");
    }

    fn on_download_progress(&mut self, downloaded: u64, total: u64) {
        if total > 0 {
            let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
            eprint!("\rDownloading model... {pct}%");
        } else {
            eprint!("\rDownloading model... {downloaded} bytes");
        }
        self.printed_bar = true;
    }

    fn on_progress(&mut self, event: &ProgressEvent) {
        eprint!(
            "\rTranscribing... {}% ({}/{})",
            event.percent, event.current, event.total
        );
        self.printed_bar = true;
    }

    fn on_line(&mut self, start: &str, end: &str, text: &str) {
        self.finish_bar();
        println!("[{start} --> {end}] {text}");
    }
}

/// Asks on stdin before a model download.
struct PromptPolicy;

impl DownloadPolicy for PromptPolicy {
    fn confirm_download(&self, model: ModelSize) -> bool {
        eprint!(
            "{} model ({}) not found. Download now? [y/N] ",
            model,
            model.download_size()
        );
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}
