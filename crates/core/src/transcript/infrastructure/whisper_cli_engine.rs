//! Transcription engine that drives the installed Whisper command-line tool.
//!
//! The tool only announces progress through its console output, so this
//! engine streams stdout/stderr through [`OutputScraper`] and reads the
//! final segment list from the JSON file the tool writes next to its input.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;

use serde::Deserialize;

use crate::shared::constants::SAMPLE_RATE;
use crate::shared::runtime_env::{whisper_entry_point, RuntimeEnv};
use crate::transcript::domain::decode_options::DecodeOptions;
use crate::transcript::domain::download_policy::DownloadPolicy;
use crate::transcript::domain::engine::{ModelReadiness, TranscriptSink, TranscriptionEngine};
use crate::transcript::domain::model_size::ModelSize;
use crate::transcript::domain::output_scraper::OutputScraper;
use crate::transcript::domain::segment::TranscriptionSegment;
use crate::transcript::infrastructure::model_store;

pub struct WhisperCliEngine {
    env: RuntimeEnv,
    model: ModelSize,
}

#[derive(Deserialize)]
struct ToolOutput {
    #[serde(default)]
    segments: Vec<ToolSegment>,
}

#[derive(Deserialize)]
struct ToolSegment {
    start: f64,
    end: f64,
    text: String,
}

impl WhisperCliEngine {
    pub fn new(env: RuntimeEnv, model: ModelSize) -> Self {
        Self { env, model }
    }

    fn tool_command(&self) -> Result<Command, Box<dyn std::error::Error>> {
        let script = whisper_entry_point(&self.env.lib_dir).ok_or_else(|| {
            format!(
                "transcription tool not found under {}; run the installer first",
                self.env.lib_dir.display()
            )
        })?;

        // pip --target installs a native launcher on Windows and a Python
        // script elsewhere.
        let mut command = if script.extension().is_some_and(|e| e == "exe") {
            Command::new(script)
        } else {
            let mut c = Command::new(&self.env.python);
            c.arg(script);
            c
        };
        command
            .env("PYTHONPATH", &self.env.lib_dir)
            .env("PYTHONUNBUFFERED", "1")
            .env("PYTHONIOENCODING", "utf-8");
        Ok(command)
    }
}

impl TranscriptionEngine for WhisperCliEngine {
    fn name(&self) -> &'static str {
        "whisper-cli"
    }

    fn prepare(
        &mut self,
        policy: &dyn DownloadPolicy,
        sink: &mut dyn TranscriptSink,
    ) -> Result<ModelReadiness, Box<dyn std::error::Error>> {
        if whisper_entry_point(&self.env.lib_dir).is_none() {
            return Err(format!(
                "transcription runtime is not installed under {}",
                self.env.lib_dir.display()
            )
            .into());
        }

        if !model_store::checkpoint_cached(self.model) {
            sink.on_status(&format!("Model '{}' not found. Checking download...", self.model));
            if !policy.confirm_download(self.model) {
                return Ok(ModelReadiness::Declined);
            }
            sink.on_status(&format!(
                "Downloading model '{}' (Size: {})",
                self.model,
                self.model.download_size()
            ));
        }
        Ok(ModelReadiness::Ready)
    }

    fn transcribe_chunk(
        &mut self,
        chunk: &[f32],
        options: &DecodeOptions,
        sink: &mut dyn TranscriptSink,
    ) -> Result<Vec<TranscriptionSegment>, Box<dyn std::error::Error>> {
        let work_dir = tempfile::TempDir::new()?;
        let wav_path = work_dir.path().join("chunk.wav");
        write_chunk_wav(&wav_path, chunk)?;

        let mut command = self.tool_command()?;
        command
            .arg(&wav_path)
            .args(build_args(self.model, work_dir.path(), options))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        log::debug!("running transcription tool for a {}-sample chunk", chunk.len());
        let mut child = command.spawn()?;

        // The progress bar goes to stderr and transcript lines to stdout;
        // funnel both into the scraper in arrival order.
        let (tx, rx) = crossbeam_channel::unbounded::<String>();
        let mut readers = Vec::new();
        for pipe in [
            child.stdout.take().map(boxed_reader),
            child.stderr.take().map(boxed_reader),
        ]
        .into_iter()
        .flatten()
        {
            let tx = tx.clone();
            readers.push(thread::spawn(move || pump(pipe, &tx)));
        }
        drop(tx);

        let mut scraper = OutputScraper::new();
        for slice in rx {
            scraper.write(&slice, sink);
        }
        scraper.finish(sink);

        for reader in readers {
            let _ = reader.join();
        }
        let status = child.wait()?;
        if !status.success() {
            return Err(format!(
                "transcription tool exited with {}: {}",
                status,
                tail(scraper.captured(), 2000)
            )
            .into());
        }

        let json_path = work_dir.path().join("chunk.json");
        let raw = std::fs::read_to_string(&json_path)
            .map_err(|e| format!("missing tool output {}: {e}", json_path.display()))?;
        let output: ToolOutput = serde_json::from_str(&raw)?;

        Ok(output
            .segments
            .into_iter()
            .map(|s| TranscriptionSegment {
                start: s.start,
                end: s.end,
                text: s.text,
            })
            .collect())
    }
}

fn boxed_reader(r: impl Read + Send + 'static) -> Box<dyn Read + Send> {
    Box::new(r)
}

fn pump(mut pipe: Box<dyn Read + Send>, tx: &crossbeam_channel::Sender<String>) {
    let mut buf = [0u8; 4096];
    loop {
        match pipe.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                let slice = String::from_utf8_lossy(&buf[..n]).into_owned();
                if tx.send(slice).is_err() {
                    break;
                }
            }
        }
    }
}

/// Write one chunk of 16 kHz mono samples as a 16-bit PCM WAV.
fn write_chunk_wav(path: &Path, samples: &[f32]) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * i16::MAX as f32) as i16)?;
    }
    writer.finalize()
}

fn build_args(model: ModelSize, output_dir: &Path, options: &DecodeOptions) -> Vec<String> {
    let mut args = vec![
        "--model".to_string(),
        model.as_str().to_string(),
        "--task".to_string(),
        "transcribe".to_string(),
        "--verbose".to_string(),
        "True".to_string(),
        "--output_format".to_string(),
        "json".to_string(),
        "--output_dir".to_string(),
        output_dir.display().to_string(),
        "--temperature".to_string(),
        options.temperature.to_string(),
        "--best_of".to_string(),
        options.best_of.to_string(),
        "--beam_size".to_string(),
        options.beam_size.to_string(),
        "--logprob_threshold".to_string(),
        options.logprob_threshold.to_string(),
        "--no_speech_threshold".to_string(),
        options.no_speech_threshold.to_string(),
        "--condition_on_previous_text".to_string(),
        python_bool(options.condition_on_previous_text).to_string(),
        "--fp16".to_string(),
        "False".to_string(),
    ];
    if let Some(ref language) = options.language {
        args.push("--language".to_string());
        args.push(language.clone());
    }
    if let Some(ref prompt) = options.initial_prompt {
        args.push("--initial_prompt".to_string());
        args.push(prompt.clone());
    }
    args
}

fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn tail(text: &str, max: usize) -> &str {
    let mut start = text.len().saturating_sub(max);
    // Avoid slicing mid-codepoint
    while start < text.len() && !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_defaults() {
        let args = build_args(ModelSize::Small, Path::new("/tmp/out"), &DecodeOptions::default());
        let joined = args.join(" ");
        assert!(joined.contains("--model small"));
        assert!(joined.contains("--verbose True"));
        assert!(joined.contains("--output_format json"));
        assert!(joined.contains("--temperature 0"));
        assert!(joined.contains("--best_of 10"));
        assert!(joined.contains("--beam_size 10"));
        assert!(joined.contains("--condition_on_previous_text False"));
        assert!(!joined.contains("--language"));
        assert!(!joined.contains("--initial_prompt"));
    }

    #[test]
    fn test_build_args_language_and_prompt() {
        let options = DecodeOptions {
            language: Some("ja".to_string()),
            initial_prompt: Some("topic".to_string()),
            ..DecodeOptions::default()
        };
        let args = build_args(ModelSize::Tiny, Path::new("out"), &options);
        let lang_pos = args.iter().position(|a| a == "--language").unwrap();
        assert_eq!(args[lang_pos + 1], "ja");
        let prompt_pos = args.iter().position(|a| a == "--initial_prompt").unwrap();
        assert_eq!(args[prompt_pos + 1], "topic");
    }

    #[test]
    fn test_write_chunk_wav_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("chunk.wav");
        let samples = vec![0.0f32, 0.5, -0.5, 1.0, -1.0];
        write_chunk_wav(&path, &samples).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, SAMPLE_RATE);
        assert_eq!(reader.spec().channels, 1);
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read.len(), samples.len());
        assert_eq!(read[0], 0);
        assert_eq!(read[3], i16::MAX);
    }

    #[test]
    fn test_tool_output_parsing() {
        let raw = r#"{"text": "hi", "segments": [
            {"id": 0, "start": 0.0, "end": 2.5, "text": " hi", "tokens": []}
        ], "language": "en"}"#;
        let output: ToolOutput = serde_json::from_str(raw).unwrap();
        assert_eq!(output.segments.len(), 1);
        assert_eq!(output.segments[0].text, " hi");
    }

    #[test]
    fn test_tail_respects_char_boundaries() {
        let text = "aあいうえお";
        let t = tail(text, 4);
        assert!(text.ends_with(t));
    }
}
