pub mod install_runtime_use_case;
pub mod transcribe_audio_use_case;
pub mod verify_install_use_case;
