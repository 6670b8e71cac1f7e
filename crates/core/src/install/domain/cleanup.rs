use std::fs;
use std::path::Path;

/// Match a directory entry name against a cleanup pattern.
///
/// Patterns are either literal names or a prefix followed by a single
/// trailing `*`.
pub fn pattern_matches(name: &str, pattern: &str) -> bool {
    match pattern.strip_suffix('*') {
        Some(prefix) => name.starts_with(prefix),
        None => name == pattern,
    }
}

/// Remove entries under `target_dir` whose names match any pattern.
///
/// Returns the number of entries removed; failures to remove individual
/// entries are logged and skipped.
pub fn clean_target_dir(target_dir: &Path, patterns: &[&str], log: &mut dyn FnMut(&str)) -> usize {
    let entries = match fs::read_dir(target_dir) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !patterns.iter().any(|p| pattern_matches(&name, p)) {
            continue;
        }

        let path = entry.path();
        let result = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => log(&format!("Warning: could not remove {name}: {e}")),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("torch", "torch*", true)]
    #[case("torch-2.3.0.dist-info", "torch*", true)]
    #[case("torchaudio", "torchaudio*", true)]
    #[case("torchgen", "torchgen", true)]
    #[case("torchgen2", "torchgen", false)]
    #[case("numpy", "torch*", false)]
    fn test_pattern_matches(#[case] name: &str, #[case] pattern: &str, #[case] expected: bool) {
        assert_eq!(pattern_matches(name, pattern), expected);
    }

    #[test]
    fn test_clean_removes_only_matches() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("torch")).unwrap();
        fs::write(tmp.path().join("torch-2.3.0.dist-info"), b"x").unwrap();
        fs::create_dir(tmp.path().join("numpy")).unwrap();
        fs::write(tmp.path().join("whisper.py"), b"x").unwrap();

        let mut warnings = Vec::new();
        let removed = clean_target_dir(
            tmp.path(),
            &["torch*", "torchgen"],
            &mut |msg| warnings.push(msg.to_string()),
        );

        assert_eq!(removed, 2);
        assert!(warnings.is_empty());
        assert!(!tmp.path().join("torch").exists());
        assert!(!tmp.path().join("torch-2.3.0.dist-info").exists());
        assert!(tmp.path().join("numpy").exists());
        assert!(tmp.path().join("whisper.py").exists());
    }

    #[test]
    fn test_clean_missing_dir_is_noop() {
        let removed = clean_target_dir(Path::new("/nonexistent/dir"), &["torch*"], &mut |_| {});
        assert_eq!(removed, 0);
    }
}
