use super::select::{choose_config, choose_output_dir, DEFAULT_OUTPUT_DIR};
use crate::config::{load_schema, Strictness};
use crate::progress::ProgressReporter;
use crate::sink::{CsvSinkFactory, DiscardSinkFactory};
use crate::walker::{GenerationStats, Generator};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

pub struct GenerateArgs {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub config_dir: PathBuf,
    pub seed: Option<u64>,
    pub delimiter: String,
    pub progress: bool,
    pub dry_run: bool,
    pub strict: bool,
    pub json: bool,
}

/// JSON output for a generation run
#[derive(Serialize, JsonSchema)]
pub(crate) struct GenerateJsonOutput {
    config: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dir: Option<String>,
    dry_run: bool,
    elapsed_secs: f64,
    statistics: GenerationStats,
    warnings: Vec<String>,
    files: Vec<GeneratedFile>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct GeneratedFile {
    table: String,
    path: String,
    rows: u64,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let delimiter = parse_delimiter(&args.delimiter)?;

    let prompted = args.config.is_none();
    let config_path = match args.config {
        Some(path) => path,
        None => choose_config(&args.config_dir)?,
    };
    if !config_path.exists() {
        anyhow::bail!("config file does not exist: {}", config_path.display());
    }

    let loaded = load_schema(&config_path, Strictness::from_flag(args.strict))?;
    let schema = &loaded.schema;

    let output_dir = match args.output {
        Some(dir) => dir,
        None if prompted && !args.dry_run => choose_output_dir()?,
        None => PathBuf::from(DEFAULT_OUTPUT_DIR),
    };

    let generator = match args.seed {
        Some(seed) => Generator::new(schema).with_seed(seed),
        None => Generator::new(schema),
    };
    debug!(seed = generator.seed(), config = %config_path.display(), "generating");

    if !args.json {
        println!(
            "Using configuration: {} ({} tables)",
            config_path.display(),
            schema.len()
        );
    }

    let mut reporter = ProgressReporter::new(args.progress, args.json);
    let start_time = Instant::now();

    let (stats, files) = if args.dry_run {
        let mut factory = DiscardSinkFactory::new();
        (generator.run(&mut factory, &mut reporter)?, Vec::new())
    } else {
        let mut factory = CsvSinkFactory::new(&output_dir).with_delimiter(delimiter);
        let stats = generator.run(&mut factory, &mut reporter)?;
        let files = factory
            .written_files()
            .iter()
            .map(|f| GeneratedFile {
                table: f.table.clone(),
                path: f.path.display().to_string(),
                rows: f.rows,
            })
            .collect();
        (stats, files)
    };

    let elapsed = start_time.elapsed();

    if args.json {
        let output = GenerateJsonOutput {
            config: config_path.display().to_string(),
            output_dir: (!args.dry_run).then(|| output_dir.display().to_string()),
            dry_run: args.dry_run,
            elapsed_secs: elapsed.as_secs_f64(),
            statistics: stats,
            warnings: loaded.warnings.iter().map(|w| w.to_string()).collect(),
            files,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("Rows per table:");
    for table in &stats.tables {
        println!("  {}: {}", table.name, table.rows);
    }
    println!("Total: {} rows in {:.3?}", stats.total_rows, elapsed);
    println!("Seed: {} (pass --seed {} to reproduce)", stats.seed, stats.seed);

    if args.dry_run {
        println!("\nDry run complete. No files written.");
    } else {
        println!(
            "\nFinished generating data. Output can be found in {}",
            output_dir.display()
        );
    }

    Ok(())
}

/// Parse `--delimiter`: one ASCII character, or `\t` / `tab` for a tab.
pub(crate) fn parse_delimiter(raw: &str) -> anyhow::Result<u8> {
    match raw {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }
    let bytes = raw.as_bytes();
    if bytes.len() != 1 || !bytes[0].is_ascii() {
        anyhow::bail!(
            "invalid delimiter '{}': expected a single ASCII character",
            raw
        );
    }
    if matches!(bytes[0], b'"' | b'\n' | b'\r') {
        anyhow::bail!("invalid delimiter '{}': reserved by CSV quoting", raw.escape_default());
    }
    Ok(bytes[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("|").unwrap(), b'|');
        assert_eq!(parse_delimiter("\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
    }

    #[test]
    fn test_parse_delimiter_rejects() {
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(",;").is_err());
        assert!(parse_delimiter("é").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("\n").is_err());
    }
}
