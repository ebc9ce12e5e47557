//! Finding configuration files in a directory.

use std::path::{Path, PathBuf};

const CONFIG_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Whether `path` has a configuration file extension.
pub fn is_config_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CONFIG_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// All configuration files below `dir` (recursive), sorted by path.
///
/// # Errors
///
/// Returns an error if `dir` does not exist or a matched path cannot be read.
pub fn list_config_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("config directory does not exist: {}", dir.display());
    }

    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();

    for ext in CONFIG_EXTENSIONS {
        let pattern = format!("{}/**/*.{}", escaped, ext);
        let entries = glob::glob(&pattern)
            .map_err(|e| anyhow::anyhow!("invalid glob pattern '{}': {}", pattern, e))?;

        for entry in entries {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        files.push(path);
                    }
                }
                Err(e) => {
                    anyhow::bail!("error reading path for pattern '{}': {}", pattern, e);
                }
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
