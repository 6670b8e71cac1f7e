use crate::shared::runtime_env::RuntimeEnv;
use crate::transcript::domain::engine::TranscriptionEngine;
use crate::transcript::domain::model_size::ModelSize;
#[cfg(not(feature = "engine-native"))]
use crate::transcript::infrastructure::whisper_cli_engine::WhisperCliEngine;

/// Whether the selected engine needs the installed Python runtime.
///
/// The native engine carries its own inference code; the CLI engine needs
/// the installed tool.
pub fn requires_installed_runtime() -> bool {
    cfg!(not(feature = "engine-native"))
}

/// Build the transcription engine for a run.
///
/// The native in-process engine is preferred when compiled in; the CLI
/// engine remains the compatibility fallback that scrapes console output.
pub fn create_engine(env: &RuntimeEnv, model: ModelSize) -> Box<dyn TranscriptionEngine> {
    #[cfg(feature = "engine-native")]
    {
        let _ = env;
        Box::new(super::native_whisper_engine::NativeWhisperEngine::new(
            model,
        ))
    }
    #[cfg(not(feature = "engine-native"))]
    {
        Box::new(WhisperCliEngine::new(env.clone(), model))
    }
}
