//! CLI for generating schema configs.
//!
//! Usage:
//!   # Fixed e-commerce schema at a scale preset
//!   gen-configs --scale medium > config/shop-medium.json
//!
//!   # Random schema shape
//!   gen-configs --random --seed 7 --max-tables 12 -o config/random-7.json

use clap::Parser;
use fixture_schemas::{ecommerce, random_schema, Scale, ShapeLimits};
use std::fs;

#[derive(Parser, Debug)]
#[command(name = "gen-configs")]
#[command(about = "Generate schema configs for fixture-forge", long_about = None)]
struct Args {
    /// Scale preset: small, medium, large, xlarge (e-commerce schema)
    /// Ignored with --random
    #[arg(short, long, default_value = "small")]
    scale: String,

    /// Emit a random schema shape instead of the e-commerce schema
    #[arg(long)]
    random: bool,

    /// Random seed for reproducibility (only with --random)
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Maximum number of tables (only with --random)
    #[arg(long, default_value = "8")]
    max_tables: usize,

    /// Maximum hierarchy depth (only with --random)
    #[arg(long, default_value = "4")]
    max_depth: usize,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (config, summary) = if args.random {
        let limits = ShapeLimits {
            max_tables: args.max_tables,
            max_depth: args.max_depth,
            ..ShapeLimits::default()
        };
        let shape = random_schema(args.seed, &limits);
        let total: u64 = shape.expected_rows.iter().map(|(_, n)| n).sum();
        let summary = format!(
            "random schema (seed {}, {} tables, {} rows)",
            args.seed,
            shape.expected_rows.len(),
            total
        );
        (shape.config, summary)
    } else {
        let scale: Scale = args.scale.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        let total: u64 = scale.ecommerce_row_counts().iter().map(|(_, n)| n).sum();
        (
            ecommerce(scale),
            format!("e-commerce schema ({:?}, {} rows)", scale, total),
        )
    };

    let content = serde_json::to_string_pretty(&config)?;
    match args.output {
        Some(path) => {
            fs::write(&path, content + "\n")?;
            eprintln!("Generated {} to {}", summary, path);
        }
        None => println!("{}", content),
    }

    Ok(())
}
