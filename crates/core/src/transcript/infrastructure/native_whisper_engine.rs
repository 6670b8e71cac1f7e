//! In-process engine using whisper.cpp via whisper-rs.
//!
//! Unlike the CLI shim this gets structured segments straight from the
//! library, so nothing is scraped from console text.

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::shared::timestamp::format_min_sec;
use crate::transcript::domain::decode_options::DecodeOptions;
use crate::transcript::domain::download_policy::DownloadPolicy;
use crate::transcript::domain::engine::{ModelReadiness, TranscriptSink, TranscriptionEngine};
use crate::transcript::domain::model_size::ModelSize;
use crate::transcript::domain::segment::TranscriptionSegment;
use crate::transcript::infrastructure::model_store;

pub struct NativeWhisperEngine {
    model: ModelSize,
    context: Option<WhisperContext>,
}

impl NativeWhisperEngine {
    pub fn new(model: ModelSize) -> Self {
        Self {
            model,
            context: None,
        }
    }
}

impl TranscriptionEngine for NativeWhisperEngine {
    fn name(&self) -> &'static str {
        "whisper-native"
    }

    fn prepare(
        &mut self,
        policy: &dyn DownloadPolicy,
        sink: &mut dyn TranscriptSink,
    ) -> Result<ModelReadiness, Box<dyn std::error::Error>> {
        let path = model_store::ggml_path(self.model)?;
        if !path.exists() {
            sink.on_status(&format!("Model '{}' not found. Checking download...", self.model));
            if !policy.confirm_download(self.model) {
                return Ok(ModelReadiness::Declined);
            }
            sink.on_status(&format!(
                "Downloading model '{}' (Size: {})",
                self.model,
                self.model.download_size()
            ));
            let mut on_progress = |downloaded: u64, total: u64| {
                sink.on_download_progress(downloaded, total);
            };
            model_store::download_ggml(self.model, Some(&mut on_progress))?;
        }

        sink.on_status(&format!("Loading model: {}", self.model));
        let context = WhisperContext::new_with_params(
            path.to_str().ok_or("Invalid model path")?,
            WhisperContextParameters::default(),
        )
        .map_err(|e| format!("Failed to load model: {e}"))?;
        self.context = Some(context);
        Ok(ModelReadiness::Ready)
    }

    fn transcribe_chunk(
        &mut self,
        chunk: &[f32],
        options: &DecodeOptions,
        sink: &mut dyn TranscriptSink,
    ) -> Result<Vec<TranscriptionSegment>, Box<dyn std::error::Error>> {
        let context = self
            .context
            .as_ref()
            .ok_or("engine used before prepare()")?;

        let mut state = context
            .create_state()
            .map_err(|e| format!("Failed to create decoder state: {e}"))?;

        let strategy = if options.beam_size > 1 {
            SamplingStrategy::BeamSearch {
                beam_size: options.beam_size as i32,
                patience: -1.0,
            }
        } else {
            SamplingStrategy::Greedy {
                best_of: options.best_of as i32,
            }
        };

        let mut params = FullParams::new(strategy);
        params.set_language(Some(options.language.as_deref().unwrap_or("auto")));
        params.set_translate(false);
        params.set_token_timestamps(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_temperature(options.temperature as f32);
        params.set_logprob_thold(options.logprob_threshold as f32);
        params.set_no_speech_thold(options.no_speech_threshold as f32);
        params.set_no_context(!options.condition_on_previous_text);
        if let Some(ref prompt) = options.initial_prompt {
            params.set_initial_prompt(prompt);
        }
        params.set_n_threads(num_cpus().min(4) as i32);

        state
            .full(params, chunk)
            .map_err(|e| format!("Inference failed: {e}"))?;

        let mut segments = Vec::new();
        let num_segments = state.full_n_segments();
        for seg_idx in 0..num_segments {
            let segment = match state.get_segment(seg_idx) {
                Some(s) => s,
                None => continue,
            };

            // Timestamps are in centiseconds (10ms units)
            let start = segment.start_timestamp() as f64 / 100.0;
            let end = segment.end_timestamp() as f64 / 100.0;

            let mut text = String::new();
            let n_tokens = segment.n_tokens();
            for tok_idx in 0..n_tokens {
                let token = match segment.get_token(tok_idx) {
                    Some(t) => t,
                    None => continue,
                };
                let piece = match token.to_str() {
                    Ok(p) => p,
                    Err(_) => continue,
                };
                // Skip special tokens ([_BEG_], <|endoftext|>, ...)
                let trimmed = piece.trim();
                if trimmed.starts_with('[') || trimmed.starts_with('<') {
                    continue;
                }
                text.push_str(piece);
            }

            let text = text.trim().to_string();
            if text.is_empty() {
                continue;
            }

            sink.on_segment_boundary(end);
            sink.on_line(&format_min_sec(start), &format_min_sec(end), &text);
            segments.push(TranscriptionSegment { start, end, text });
        }

        Ok(segments)
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcribe_before_prepare_errors() {
        let mut engine = NativeWhisperEngine::new(ModelSize::Tiny);
        let mut sink = crate::transcript::domain::engine::NullSink;
        let result = engine.transcribe_chunk(&[0.0; 160], &DecodeOptions::default(), &mut sink);
        assert!(result.is_err());
    }
}
