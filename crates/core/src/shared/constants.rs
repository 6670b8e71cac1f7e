/// Sample rate the transcription model expects.
pub const SAMPLE_RATE: u32 = 16000;

/// Length of one transcription chunk: 30 minutes of 16 kHz mono audio.
pub const CHUNK_SECONDS: usize = 30 * 60;
pub const CHUNK_SAMPLES: usize = CHUNK_SECONDS * SAMPLE_RATE as usize;

pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "aac", "ogg", "flac"];

/// Directory (next to the executable) that receives the installed runtime.
pub const RUNTIME_DIR_NAME: &str = "pytorch_libs";

/// Optional directory holding pre-bundled wheel files for offline installs.
pub const BUNDLED_WHEELS_DIR: &str = "third_party_wheels";

pub const CPU_WHEEL_INDEX_URL: &str = "https://download.pytorch.org/whl/cpu";

pub const CORE_RUNTIME_PACKAGES: &[&str] = &["torch", "torchvision", "torchaudio", "numpy"];
pub const EXTRA_RUNTIME_PACKAGES: &[&str] =
    &["tqdm", "mpmath", "tiktoken", "regex", "numba", "llvmlite"];
pub const TRANSCRIPTION_PACKAGE: &str = "openai-whisper";

/// Leftovers from a previous install that must be removed before a new one.
pub const CLEANUP_PATTERNS: &[&str] = &["torch*", "torchvision*", "torchaudio*", "torchgen"];

pub const GGML_MODEL_BASE_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Languages offered for transcription; "auto" enables language detection.
pub const LANGUAGES: &[&str] = &["auto", "ja", "en", "zh", "ko", "es", "fr", "de", "ru"];
