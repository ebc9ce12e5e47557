use super::config_args::{resolve_config_targets, ValidationTally};
use crate::config::{load_schema, LoadedSchema, Strictness};
use crate::schema::{Schema, Table};
use schemars::JsonSchema;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// JSON output for `validate` (one entry per config file)
#[derive(Serialize, JsonSchema)]
pub(crate) struct ValidateJsonOutput {
    total_files: usize,
    valid: usize,
    invalid: usize,
    /// Glob matches that are not config files
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<String>,
    strict: bool,
    elapsed_secs: f64,
    results: Vec<ValidateFileResult>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct ValidateFileResult {
    file: String,
    /// "valid" or "invalid"
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    warnings: Vec<String>,
    tables: Vec<TableSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_rows: Option<u64>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct TableSummary {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    /// Distance from the root table (roots are 0)
    depth: usize,
    /// `rows` for roots, `rows_per_parent` for children
    rows_per_batch: u64,
    expected_rows: u64,
    columns: Vec<ColumnSummary>,
}

#[derive(Serialize, JsonSchema)]
pub(crate) struct ColumnSummary {
    name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    column_type: Option<String>,
    generator: String,
}

pub fn run(file: PathBuf, strict: bool, fail_fast: bool, json: bool) -> anyhow::Result<()> {
    let targets = resolve_config_targets(&file)?;
    let strictness = Strictness::from_flag(strict);
    let start_time = Instant::now();

    let total_files = targets.files.len();
    let mut tally = ValidationTally::default();
    let mut results = Vec::with_capacity(total_files);

    for (i, path) in targets.files.iter().enumerate() {
        if !json && i > 0 {
            println!();
        }

        match load_schema(path, strictness) {
            Ok(loaded) => {
                tally.record(path, true);
                if !json {
                    print_report(path, &loaded);
                }
                results.push(file_result(path, Ok(&loaded)));
            }
            Err(e) => {
                let message = format!("{:#}", e);
                if !json {
                    println!("Validating config: {}", path.display());
                    println!("  Result: INVALID");
                    println!("  Error: {}", message);
                }
                results.push(file_result(path, Err(message)));
                tally.record(path, false);
                if fail_fast {
                    break;
                }
            }
        }
    }

    if json {
        let output = ValidateJsonOutput {
            total_files,
            valid: tally.valid,
            invalid: tally.invalid_count(),
            skipped: targets
                .skipped
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            strict,
            elapsed_secs: start_time.elapsed().as_secs_f64(),
            results,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if targets.is_batch {
        println!();
        println!(
            "Validated {} config files: {} valid, {} invalid",
            total_files,
            tally.valid,
            tally.invalid_count()
        );
        if !targets.skipped.is_empty() {
            println!("Skipped {} non-config files", targets.skipped.len());
        }
        if fail_fast && !tally.all_valid() {
            println!("Stopped at first failure (--fail-fast)");
        }
    }

    if !tally.all_valid() {
        if json {
            std::process::exit(1);
        }
        anyhow::bail!("validation failed for: {}", tally.invalid_list());
    }

    Ok(())
}

fn file_result(path: &Path, outcome: Result<&LoadedSchema, String>) -> ValidateFileResult {
    match outcome {
        Ok(loaded) => {
            let tables = table_summaries(&loaded.schema);
            let total_rows = tables
                .iter()
                .fold(0u64, |acc, t| acc.saturating_add(t.expected_rows));
            ValidateFileResult {
                file: path.display().to_string(),
                status: "valid".to_string(),
                error: None,
                warnings: loaded.warnings.iter().map(|w| w.to_string()).collect(),
                tables,
                total_rows: Some(total_rows),
            }
        }
        Err(message) => ValidateFileResult {
            file: path.display().to_string(),
            status: "invalid".to_string(),
            error: Some(message),
            warnings: Vec::new(),
            tables: Vec::new(),
            total_rows: None,
        },
    }
}

fn table_summaries(schema: &Schema) -> Vec<TableSummary> {
    let graph = schema.graph();
    schema
        .tables()
        .iter()
        .zip(schema.expected_row_counts())
        .enumerate()
        .map(|(idx, (table, (_, expected)))| TableSummary {
            name: table.name.clone(),
            parent: table.parent.clone(),
            depth: graph.depth(idx),
            rows_per_batch: table.batch_size(),
            expected_rows: expected,
            columns: table
                .columns()
                .iter()
                .map(|c| ColumnSummary {
                    name: c.name.clone(),
                    column_type: c.declared_type.clone(),
                    generator: c.generator.to_string(),
                })
                .collect(),
        })
        .collect()
}

fn print_report(path: &Path, loaded: &LoadedSchema) {
    let schema = &loaded.schema;
    let expected = schema.expected_row_counts();

    println!("Validating config: {}", path.display());
    for (idx, table) in schema.roots() {
        print_table(schema, &expected, idx, table, 1);
    }

    let total = expected
        .iter()
        .fold(0u64, |acc, (_, n)| acc.saturating_add(*n));
    println!("  Expected rows: {} total", total);

    if loaded.warnings.is_empty() {
        println!("  Result: VALID");
    } else {
        for warning in &loaded.warnings {
            println!("  Warning: {}", warning);
        }
        println!("  Result: VALID ({} warnings)", loaded.warnings.len());
    }
}

fn print_table(schema: &Schema, expected: &[(&str, u64)], idx: usize, table: &Table, level: usize) {
    let indent = "  ".repeat(level);
    let total = expected[idx].1;
    if table.is_root() {
        println!("{}{} ({} rows)", indent, table.name, total);
    } else {
        println!(
            "{}{} ({} per parent row, {} total)",
            indent, table.name, table.rows_per_parent, total
        );
    }

    for column in table.columns() {
        match &column.declared_type {
            Some(ty) => println!("{}  - {} [{}]: {}", indent, column.name, ty, column.generator),
            None => println!("{}  - {}: {}", indent, column.name, column.generator),
        }
    }

    for (child_idx, child) in schema.children_of(&table.name) {
        print_table(schema, expected, child_idx, child, level + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorSpec;
    use crate::schema::Column;

    fn shop() -> Schema {
        Schema::new(vec![
            Table::new("users")
                .rows(3)
                .column(Column::new("id", GeneratorSpec::Increment).with_type("int")),
            Table::new("orders")
                .child_of("users")
                .rows_per_parent(2)
                .column(Column::new("user_id", GeneratorSpec::ParentKey("id".into()))),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_summaries() {
        let summaries = table_summaries(&shop());
        assert_eq!(summaries.len(), 2);

        assert_eq!(summaries[0].name, "users");
        assert_eq!(summaries[0].depth, 0);
        assert_eq!(summaries[0].rows_per_batch, 3);
        assert_eq!(summaries[0].expected_rows, 3);
        assert_eq!(summaries[0].columns[0].column_type.as_deref(), Some("int"));
        assert_eq!(summaries[0].columns[0].generator, "increment");

        assert_eq!(summaries[1].parent.as_deref(), Some("users"));
        assert_eq!(summaries[1].depth, 1);
        assert_eq!(summaries[1].expected_rows, 6);
        assert_eq!(summaries[1].columns[0].generator, "parent_key(id)");
    }

    #[test]
    fn test_invalid_file_result() {
        let result = file_result(Path::new("bad.json"), Err("cycle".into()));
        assert_eq!(result.status, "invalid");
        assert_eq!(result.error.as_deref(), Some("cycle"));
        assert!(result.total_rows.is_none());
    }

    #[test]
    fn test_valid_file_result_totals() {
        let loaded = LoadedSchema {
            schema: shop(),
            warnings: Vec::new(),
        };
        let result = file_result(Path::new("shop.json"), Ok(&loaded));
        assert_eq!(result.status, "valid");
        assert_eq!(result.total_rows, Some(9));
    }
}
