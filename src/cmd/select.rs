//! Interactive config file and output directory selection.

use crate::config::list_config_files;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};

const PROMPT: &str = "Enter the number of the configuration file to use: ";
const OUTPUT_PROMPT: &str = "Enter the output directory for the CSV files (default: ./output): ";

/// Output directory used when the prompt is left empty.
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "output";

/// Print `files` as a 1-based numbered list, relative to `dir` where possible.
pub(crate) fn print_config_list(dir: &Path, files: &[PathBuf]) {
    println!("Available configuration files:");
    for (i, file) in files.iter().enumerate() {
        let shown = file.strip_prefix(dir).unwrap_or(file);
        println!("[{}] {}", i + 1, shown.display());
    }
}

/// Parse a 1-based menu choice into an index into a list of `count` entries.
pub(crate) fn parse_choice(input: &str, count: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

/// List the configs under `dir` and ask which one to use.
///
/// Re-prompts on invalid input; Ctrl-C or end of input aborts.
pub(crate) fn choose_config(dir: &Path) -> anyhow::Result<PathBuf> {
    let files = list_config_files(dir)?;
    if files.is_empty() {
        anyhow::bail!("no configuration files found in {}", dir.display());
    }

    print_config_list(dir, &files);

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline(PROMPT) {
            Ok(line) => match parse_choice(&line, files.len()) {
                Some(idx) => return Ok(files[idx].clone()),
                None => println!("Invalid choice. Please enter a valid number."),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                anyhow::bail!("no configuration file selected");
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Blank input keeps `default`.
pub(crate) fn parse_output_dir(input: &str, default: &Path) -> PathBuf {
    match input.trim() {
        "" => default.to_path_buf(),
        dir => PathBuf::from(dir),
    }
}

/// Ask where the CSV files should go.
///
/// End of input keeps the default; Ctrl-C aborts.
pub(crate) fn choose_output_dir() -> anyhow::Result<PathBuf> {
    let default = Path::new(DEFAULT_OUTPUT_DIR);
    let mut editor = DefaultEditor::new()?;
    match editor.readline(OUTPUT_PROMPT) {
        Ok(line) => Ok(parse_output_dir(&line, default)),
        Err(ReadlineError::Eof) => Ok(default.to_path_buf()),
        Err(ReadlineError::Interrupted) => anyhow::bail!("no output directory selected"),
        Err(e) => Err(e.into()),
    }
}
