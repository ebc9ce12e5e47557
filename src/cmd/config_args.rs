//! Resolving the `validate` argument into the config files to check.
//!
//! The argument may name one file, a directory (searched recursively like
//! `--config-dir`), or a glob. Glob matches that are not JSON/YAML configs are
//! set aside instead of failing to parse.

use crate::config::{is_config_file, list_config_files};
use std::path::{Path, PathBuf};

/// Config files selected by one argument.
#[derive(Debug)]
pub struct ConfigTargets {
    pub files: Vec<PathBuf>,
    /// Glob matches without a config extension
    pub skipped: Vec<PathBuf>,
    /// Selected by a glob or directory, so a summary line is printed
    pub is_batch: bool,
}

fn has_glob_syntax(arg: &str) -> bool {
    arg.contains(['*', '?', '['])
}

/// # Errors
///
/// Fails on a bad pattern, a missing path, or when nothing selectable is left.
pub fn resolve_config_targets(arg: &Path) -> anyhow::Result<ConfigTargets> {
    let pattern = arg.to_string_lossy();

    if has_glob_syntax(&pattern) {
        return expand_config_glob(&pattern);
    }

    if arg.is_dir() {
        let files = list_config_files(arg)?;
        if files.is_empty() {
            anyhow::bail!("no configuration files found in {}", arg.display());
        }
        return Ok(ConfigTargets {
            files,
            skipped: Vec::new(),
            is_batch: true,
        });
    }

    if !arg.exists() {
        anyhow::bail!("config file does not exist: {}", arg.display());
    }
    Ok(ConfigTargets {
        files: vec![arg.to_path_buf()],
        skipped: Vec::new(),
        is_batch: false,
    })
}

fn expand_config_glob(pattern: &str) -> anyhow::Result<ConfigTargets> {
    let entries = glob::glob(pattern)
        .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", pattern, e))?;

    let mut files = Vec::new();
    let mut skipped = Vec::new();
    for entry in entries {
        let path =
            entry.map_err(|e| anyhow::anyhow!("error reading path for pattern '{}': {}", pattern, e))?;
        if !path.is_file() {
            continue;
        }
        if is_config_file(&path) {
            files.push(path);
        } else {
            skipped.push(path);
        }
    }

    if files.is_empty() {
        anyhow::bail!("no config files match pattern: {}", pattern);
    }
    files.sort();
    skipped.sort();

    Ok(ConfigTargets {
        files,
        skipped,
        is_batch: true,
    })
}

/// Valid/invalid counts across a `validate` run.
#[derive(Debug, Default)]
pub struct ValidationTally {
    pub valid: usize,
    pub invalid: Vec<PathBuf>,
}

impl ValidationTally {
    pub fn record(&mut self, path: &Path, ok: bool) {
        if ok {
            self.valid += 1;
        } else {
            self.invalid.push(path.to_path_buf());
        }
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid.len()
    }

    pub fn all_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// Comma-separated invalid paths for the final error.
    pub fn invalid_list(&self) -> String {
        self.invalid
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_has_glob_syntax() {
        assert!(!has_glob_syntax("config/shop.json"));
        assert!(has_glob_syntax("config/*.json"));
        assert!(has_glob_syntax("config/**/*.yaml"));
        assert!(has_glob_syntax("shop?.json"));
        assert!(has_glob_syntax("[ab].yml"));
    }

    #[test]
    fn test_literal_file_keeps_any_extension() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("shop.conf");
        fs::write(&file, "{}").unwrap();

        let targets = resolve_config_targets(&file).unwrap();
        assert!(!targets.is_batch);
        assert_eq!(targets.files, vec![file]);
    }

    #[test]
    fn test_missing_literal_file() {
        let err = resolve_config_targets(Path::new("/nonexistent/shop.json")).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_glob_sets_aside_non_config_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.yaml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::write(dir.path().join("README.md"), "").unwrap();

        let targets = resolve_config_targets(&dir.path().join("*")).unwrap();
        assert!(targets.is_batch);
        assert_eq!(
            targets.files,
            vec![dir.path().join("a.yaml"), dir.path().join("b.json")]
        );
        assert_eq!(
            targets.skipped,
            vec![dir.path().join("README.md"), dir.path().join("notes.txt")]
        );
    }

    #[test]
    fn test_glob_with_only_non_config_matches() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let err = resolve_config_targets(&dir.path().join("*")).unwrap_err();
        assert!(err.to_string().contains("no config files match"));
    }

    #[test]
    fn test_directory_is_searched_recursively() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("shop.json"), "{}").unwrap();
        fs::write(dir.path().join("nested").join("blog.yml"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let targets = resolve_config_targets(dir.path()).unwrap();
        assert!(targets.is_batch);
        assert_eq!(
            targets.files,
            vec![
                dir.path().join("nested").join("blog.yml"),
                dir.path().join("shop.json")
            ]
        );
        assert!(targets.skipped.is_empty());
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let err = resolve_config_targets(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no configuration files found"));
    }

    #[test]
    fn test_validation_tally() {
        let mut tally = ValidationTally::default();
        tally.record(Path::new("a.json"), true);
        assert!(tally.all_valid());
        tally.record(Path::new("b.json"), false);
        tally.record(Path::new("c.yaml"), false);
        assert!(!tally.all_valid());
        assert_eq!(tally.valid, 1);
        assert_eq!(tally.invalid_count(), 2);
        assert_eq!(tally.invalid_list(), "b.json, c.yaml");
    }
}
