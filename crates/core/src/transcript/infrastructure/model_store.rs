//! Local model caches: the checkpoint cache the CLI tool manages itself,
//! and the ggml cache this application downloads into for the native engine.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;

use crate::shared::constants::GGML_MODEL_BASE_URL;
use crate::transcript::domain::model_size::ModelSize;

#[derive(Error, Debug)]
pub enum ModelStoreError {
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn<'a> = &'a mut dyn FnMut(u64, u64);

/// Cache directory the transcription tool downloads checkpoints into.
pub fn checkpoint_cache_dir() -> Result<PathBuf, ModelStoreError> {
    dirs::home_dir()
        .map(|d| d.join(".cache").join("whisper"))
        .ok_or(ModelStoreError::NoCacheDir)
}

/// True when the CLI tool already holds a checkpoint for `model`.
pub fn checkpoint_cached(model: ModelSize) -> bool {
    checkpoint_cache_dir()
        .map(|d| d.join(model.checkpoint_filename()).exists())
        .unwrap_or(false)
}

/// Cache directory for ggml models used by the native engine.
pub fn ggml_cache_dir() -> Result<PathBuf, ModelStoreError> {
    dirs::cache_dir()
        .map(|d| d.join("VoxTitle").join("models"))
        .ok_or(ModelStoreError::NoCacheDir)
}

pub fn ggml_path(model: ModelSize) -> Result<PathBuf, ModelStoreError> {
    Ok(ggml_cache_dir()?.join(model.ggml_filename()))
}

pub fn ggml_cached(model: ModelSize) -> bool {
    ggml_path(model).map(|p| p.exists()).unwrap_or(false)
}

/// Download the ggml model for `model` into the cache and return its path.
pub fn download_ggml(
    model: ModelSize,
    mut progress: Option<ProgressFn<'_>>,
) -> Result<PathBuf, ModelStoreError> {
    let cache_dir = ggml_cache_dir()?;
    fs::create_dir_all(&cache_dir).map_err(ModelStoreError::CacheDir)?;

    let dest = cache_dir.join(model.ggml_filename());
    let url = format!("{}/{}", GGML_MODEL_BASE_URL, model.ggml_filename());
    log::info!("downloading {} to {}", url, dest.display());

    let response = reqwest::blocking::get(&url).map_err(|e| ModelStoreError::Download {
        url: url.clone(),
        source: e,
    })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    // Write to a temp file first, then rename for atomicity
    let temp_path = dest.with_extension("part");
    let mut file = fs::File::create(&temp_path).map_err(|e| ModelStoreError::Write {
        path: temp_path.clone(),
        source: e,
    })?;

    let bytes = response.bytes().map_err(|e| ModelStoreError::Download {
        url: url.clone(),
        source: e,
    })?;

    // Report progress in chunks to avoid excessive callbacks
    let chunk_size = 1024 * 1024;
    for chunk in bytes.chunks(chunk_size) {
        file.write_all(chunk).map_err(|e| ModelStoreError::Write {
            path: temp_path.clone(),
            source: e,
        })?;
        downloaded += chunk.len() as u64;
        if let Some(ref mut cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(|e| ModelStoreError::Write {
        path: temp_path.clone(),
        source: e,
    })?;
    drop(file);

    fs::rename(&temp_path, &dest).map_err(|e| ModelStoreError::Write {
        path: dest.clone(),
        source: e,
    })?;

    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_cache_dir_under_home() {
        let dir = checkpoint_cache_dir().unwrap();
        assert!(dir.ends_with(".cache/whisper") || dir.to_string_lossy().contains("whisper"));
    }

    #[test]
    fn test_ggml_cache_dir_named_after_app() {
        let dir = ggml_cache_dir().unwrap();
        assert!(dir.to_string_lossy().contains("VoxTitle"));
        assert!(dir.to_string_lossy().contains("models"));
    }

    #[test]
    fn test_ggml_path_uses_model_filename() {
        let path = ggml_path(ModelSize::Base).unwrap();
        assert!(path.ends_with("ggml-base.bin"));
    }
}
