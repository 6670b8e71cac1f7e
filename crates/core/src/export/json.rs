//! Structured JSON export: full segment dump plus run metadata.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ExportMeta;
use crate::transcript::domain::segment::TranscriptionSegment;

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionDocument {
    pub timestamp: String,
    pub source_file: String,
    pub keyword: String,
    pub language: String,
    pub model: String,
    pub device: String,
    pub transcription: Vec<TranscriptionSegment>,
}

impl TranscriptionDocument {
    pub fn new(meta: &ExportMeta, segments: &[TranscriptionSegment]) -> Self {
        Self {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source_file: meta.source_file.clone(),
            keyword: meta.keyword.clone(),
            language: meta.language.clone(),
            model: meta.model.clone(),
            device: meta.device.clone(),
            transcription: segments.to_vec(),
        }
    }
}

pub fn write_json(
    path: &Path,
    meta: &ExportMeta,
    segments: &[TranscriptionSegment],
) -> std::io::Result<()> {
    let document = TranscriptionDocument::new(meta, segments);
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> ExportMeta {
        ExportMeta {
            source_file: "talk.mp3".to_string(),
            keyword: "astronomy".to_string(),
            language: "en".to_string(),
            model: "small".to_string(),
            device: "cpu".to_string(),
        }
    }

    #[test]
    fn test_write_json_structure() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        let segments = vec![TranscriptionSegment {
            start: 0.0,
            end: 2.5,
            text: "Hello".to_string(),
        }];
        write_json(&path, &meta(), &segments).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["source_file"], "talk.mp3");
        assert_eq!(value["model"], "small");
        assert_eq!(value["transcription"][0]["text"], "Hello");
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_document_round_trip() {
        let segments = vec![TranscriptionSegment {
            start: 1.0,
            end: 2.0,
            text: "x".to_string(),
        }];
        let doc = TranscriptionDocument::new(&meta(), &segments);
        let json = serde_json::to_string(&doc).unwrap();
        let back: TranscriptionDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back.transcription, segments);
    }
}
