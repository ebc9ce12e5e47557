use super::select::print_config_list;
use crate::config::list_config_files;
use std::path::PathBuf;

pub fn run(config_dir: PathBuf) -> anyhow::Result<()> {
    let files = list_config_files(&config_dir)?;
    if files.is_empty() {
        eprintln!("No configuration files found in {}", config_dir.display());
        return Ok(());
    }
    print_config_list(&config_dir, &files);
    Ok(())
}
