/// Decoding parameters passed through to the transcription model.
///
/// Defaults mirror the values the application has always shipped with.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeOptions {
    /// Target language code; `None` lets the model detect the language.
    pub language: Option<String>,
    /// Topic hint fed to the decoder before the first chunk.
    pub initial_prompt: Option<String>,
    pub temperature: f64,
    pub best_of: u32,
    pub beam_size: u32,
    pub logprob_threshold: f64,
    pub no_speech_threshold: f64,
    pub condition_on_previous_text: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            language: None,
            initial_prompt: None,
            temperature: 0.0,
            best_of: 10,
            beam_size: 10,
            logprob_threshold: -1.0,
            no_speech_threshold: 0.5,
            condition_on_previous_text: false,
        }
    }
}
