//! Expansion of the newline-delimited `files` glob list.

use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Expand glob patterns into an ordered, de-duplicated list of regular files.
///
/// Patterns are processed in order; matches of a single pattern come in the
/// order `glob` yields them. Blank lines are skipped. Two distinct files with
/// the same base name are rejected, as they would map to one asset name.
pub fn expand_patterns(patterns: &str) -> Result<Vec<PathBuf>, ConfigError> {
    let mut seen = HashSet::new();
    let mut names: HashMap<String, PathBuf> = HashMap::new();
    let mut files = Vec::new();

    for pattern in patterns.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let entries = glob::glob(pattern).map_err(|e| ConfigError::InvalidParameter {
            name: "files",
            reason: format!("invalid pattern '{pattern}': {e}"),
        })?;

        let mut matched = 0usize;
        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    log::warn!("Skipping unreadable match for '{pattern}': {e}");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            matched += 1;
            if !seen.insert(path.clone()) {
                continue;
            }

            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            if let Some(first) = names.get(&name) {
                return Err(ConfigError::InvalidParameter {
                    name: "files",
                    reason: format!(
                        "'{}' and '{}' would both upload as asset '{name}'",
                        first.display(),
                        path.display()
                    ),
                });
            }
            names.insert(name, path.clone());
            files.push(path);
        }

        if matched == 0 {
            log::warn!("Pattern '{pattern}' matched no files");
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expands_in_pattern_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.bin"), "a").unwrap();
        fs::write(dir.path().join("c.txt"), "c").unwrap();

        let patterns = format!(
            "{}/*.txt\n\n{}/*.bin\n",
            dir.path().display(),
            dir.path().display()
        );
        let files = expand_patterns(&patterns).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["b.txt", "c.txt", "a.bin"]);
    }

    #[test]
    fn test_skips_directories_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("app.tar.gz"), "x").unwrap();

        let patterns = format!(
            "{0}/*\n{0}/app.tar.gz",
            dir.path().display()
        );
        let files = expand_patterns(&patterns).unwrap();
        assert_eq!(files, vec![dir.path().join("app.tar.gz")]);
    }

    #[test]
    fn test_rejects_same_base_name_in_different_directories() {
        let dir = tempfile::tempdir().unwrap();
        for sub in ["a", "b"] {
            fs::create_dir(dir.path().join(sub)).unwrap();
            fs::write(dir.path().join(sub).join("app.zip"), sub).unwrap();
        }

        let patterns = format!("{0}/a/*.zip\n{0}/b/*.zip", dir.path().display());
        match expand_patterns(&patterns).unwrap_err() {
            ConfigError::InvalidParameter { name, reason } => {
                assert_eq!(name, "files");
                assert!(reason.contains("app.zip"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_pattern_names_input() {
        let err = expand_patterns("dist/[").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "files", .. }));
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        assert!(expand_patterns("\n  \n").unwrap().is_empty());
    }
}
