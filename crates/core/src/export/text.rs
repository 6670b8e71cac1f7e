//! Plain-text transcript writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::ExportMeta;
use crate::shared::timestamp::format_clock;
use crate::transcript::domain::segment::TranscriptionSegment;

pub fn write_text(
    path: &Path,
    meta: &ExportMeta,
    segments: &[TranscriptionSegment],
) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "Transcription of: {}", meta.source_file)?;
    writeln!(
        file,
        "Date: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(file, "Language: {}", meta.language)?;
    writeln!(file, "Model: {}", meta.model)?;
    writeln!(file, "{}", "-".repeat(50))?;
    writeln!(file)?;

    for segment in segments {
        writeln!(
            file,
            "[{} --> {}]",
            format_clock(segment.start as u64),
            format_clock(segment.end as u64)
        )?;
        writeln!(file, "{}", segment.text)?;
        writeln!(file)?;
    }
    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_text_layout() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.txt");
        let meta = ExportMeta {
            source_file: "talk.mp3".to_string(),
            keyword: String::new(),
            language: "en".to_string(),
            model: "base".to_string(),
            device: "cpu".to_string(),
        };
        let segments = vec![TranscriptionSegment {
            start: 5.2,
            end: 8.9,
            text: "Hello world".to_string(),
        }];
        write_text(&path, &meta, &segments).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Transcription of: talk.mp3\n"));
        assert!(content.contains("Language: en\n"));
        assert!(content.contains(&"-".repeat(50)));
        assert!(content.contains("[0:00:05 --> 0:00:08]\nHello world\n"));
    }
}
