pub mod engine_factory;
pub mod model_store;
#[cfg(feature = "engine-native")]
pub mod native_whisper_engine;
pub mod whisper_cli_engine;
