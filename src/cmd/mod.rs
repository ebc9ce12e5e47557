mod config_args;
pub(crate) mod generate;
mod list;
mod schema;
mod select;
pub(crate) mod validate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as generate_completions, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fixture-forge")]
#[command(version)]
#[command(about = "Generate relationally-consistent CSV fixture data from a table schema", long_about = None)]
pub struct Cli {
    /// Verbose diagnostics on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate one CSV file per table from a schema config
    Generate {
        /// Config file (JSON or YAML). Prompts for one from --config-dir if omitted
        config: Option<PathBuf>,

        /// Output directory (default: output). Prompts for one if CONFIG is omitted too
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory to choose a config from when none is given
        #[arg(long, default_value = "config")]
        config_dir: PathBuf,

        /// Random seed for reproducible `random` columns (default: time-based)
        #[arg(long)]
        seed: Option<u64>,

        /// Field delimiter (single ASCII character, `\t` for tab)
        #[arg(long, default_value = ",")]
        delimiter: String,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Generate without writing files and report row counts
        #[arg(long)]
        dry_run: bool,

        /// Treat malformed generator definitions as errors
        #[arg(long)]
        strict: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate config files and show the table hierarchy with expected row counts
    Validate {
        /// Config file, directory, or glob pattern (e.g., config/*.json)
        file: PathBuf,

        /// Treat malformed generator definitions as errors
        #[arg(long)]
        strict: bool,

        /// Stop on first file that fails (for glob patterns)
        #[arg(long)]
        fail_fast: bool,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// List config files available for interactive selection
    List {
        /// Directory to search for config files
        #[arg(long, default_value = "config")]
        config_dir: PathBuf,
    },

    /// Print JSON schemas for the config format and --json outputs
    Schema {
        /// Only this schema (config, generate, validate)
        #[arg(short, long)]
        command: Option<String>,

        /// Write <name>.schema.json files into this directory instead of stdout
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            config,
            output,
            config_dir,
            seed,
            delimiter,
            progress,
            dry_run,
            strict,
            json,
        } => generate::run(generate::GenerateArgs {
            config,
            output,
            config_dir,
            seed,
            delimiter,
            progress,
            dry_run,
            strict,
            json,
        }),
        Commands::Validate {
            file,
            strict,
            fail_fast,
            json,
        } => validate::run(file, strict, fail_fast, json),
        Commands::List { config_dir } => list::run(config_dir),
        Commands::Schema {
            command,
            output_dir,
        } => schema::run(command, output_dir),
        Commands::Completions { shell } => {
            generate_completions(
                shell,
                &mut Cli::command(),
                "fixture-forge",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
