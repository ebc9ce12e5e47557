//! On-disk configuration: the table schema as JSON or YAML.
//!
//! ```json
//! {
//!   "tables": [
//!     { "name": "users", "rows": 2,
//!       "columns": [ { "name": "id", "generator": { "increment": true } } ] },
//!     { "name": "orders", "parent": "users", "rows_per_parent": 2,
//!       "columns": [ { "name": "user_id", "generator": { "parent_key": "id" } } ] }
//!   ]
//! }
//! ```

mod discover;

pub use discover::{is_config_file, list_config_files};

use crate::error::SchemaError;
use crate::generator::spec;
use crate::schema::{Column, Schema, Table};
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Complete configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct SchemaConfig {
    /// Tables in display order; root tables are generated in this order
    pub tables: Vec<TableConfig>,
}

/// One table
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct TableConfig {
    /// Unique table name; also the output file name
    pub name: String,
    /// Parent table name. Absent, null or empty means a root table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Rows to generate (root tables)
    #[serde(default)]
    pub rows: u64,
    /// Rows to generate for each parent row (child tables)
    #[serde(default)]
    pub rows_per_parent: u64,
    /// Columns in output order
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

/// One column
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ColumnConfig {
    /// Column name, unique within the table; also the header field
    pub name: String,
    /// Informational column type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub column_type: Option<String>,
    /// Generator object; see `GeneratorKeys` for recognized keys
    #[serde(default)]
    #[schemars(with = "Option<GeneratorKeys>")]
    pub generator: Option<Map<String, Value>>,
}

/// Recognized generator keys. The first usable key, in this order, wins.
#[derive(JsonSchema)]
#[allow(dead_code)]
struct GeneratorKeys {
    /// Always this literal value
    hardcoded: Option<String>,
    /// Row number within the current batch, starting at 1 (presence is enough)
    increment: Option<Value>,
    /// Table-wide counter starting at 0, shared across all parents
    table_increment: Option<bool>,
    /// Copy this column's value from the parent row
    parent_key: Option<String>,
    /// Random alphanumeric string
    random: Option<RandomKeys>,
    /// Cycle through these values by row number
    predefined_list: Option<Vec<String>>,
}

#[derive(JsonSchema)]
#[allow(dead_code)]
struct RandomKeys {
    /// Number of random characters (default 10)
    length: Option<f64>,
    prefix: Option<String>,
    suffix: Option<String>,
}

/// How strictly generator objects are checked when building the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Malformed generator keys are skipped with a warning
    #[default]
    Lenient,
    /// Malformed generator keys are schema errors
    Strict,
}

impl Strictness {
    pub fn from_flag(strict: bool) -> Self {
        if strict {
            Strictness::Strict
        } else {
            Strictness::Lenient
        }
    }
}

/// A load-time observation that did not stop the schema from being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub table: String,
    pub column: Option<String>,
    pub message: String,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.column {
            Some(column) => write!(f, "table '{}', column '{}': {}", self.table, column, self.message),
            None => write!(f, "table '{}': {}", self.table, self.message),
        }
    }
}

/// A built schema plus everything worth telling the user about it.
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub schema: Schema,
    pub warnings: Vec<ConfigWarning>,
}

impl SchemaConfig {
    /// Load a configuration file. `.yaml`/`.yml` files are parsed as YAML,
    /// everything else as JSON.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = if is_yaml(path) {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        };
        config.with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Resolve generators and validate the table hierarchy.
    pub fn build(&self, strictness: Strictness) -> Result<LoadedSchema, SchemaError> {
        let mut warnings = Vec::new();
        let mut tables = Vec::with_capacity(self.tables.len());

        for table_cfg in &self.tables {
            tables.push(table_cfg.build(strictness, &mut warnings)?);
        }

        let schema = Schema::new(tables)?;

        for dangling in schema.dangling_parent_keys() {
            let message = if dangling.parent.is_empty() {
                format!(
                    "parent_key '{}' on a root table always generates an empty value",
                    dangling.parent_column
                )
            } else {
                format!(
                    "parent_key '{}' does not exist in parent table '{}', values will be empty",
                    dangling.parent_column, dangling.parent
                )
            };
            warnings.push(ConfigWarning {
                table: dangling.table,
                column: Some(dangling.column),
                message,
            });
        }

        for w in &warnings {
            warn!("{}", w);
        }

        Ok(LoadedSchema { schema, warnings })
    }
}

impl TableConfig {
    fn build(
        &self,
        strictness: Strictness,
        warnings: &mut Vec<ConfigWarning>,
    ) -> Result<Table, SchemaError> {
        let mut table = Table::new(self.name.clone());
        let parent = self.parent.as_deref().filter(|p| !p.is_empty());

        match parent {
            Some(parent) => {
                table = table.child_of(parent).rows_per_parent(self.rows_per_parent);
                if self.rows != 0 {
                    warnings.push(self.warning("'rows' is ignored on a child table, use 'rows_per_parent'"));
                }
            }
            None => {
                table = table.rows(self.rows);
                if self.rows_per_parent != 0 {
                    warnings.push(self.warning("'rows_per_parent' is ignored on a root table, use 'rows'"));
                }
            }
        }

        for column_cfg in &self.columns {
            let resolution = spec::resolve(column_cfg.generator.as_ref());
            for issue in resolution.issues {
                if strictness == Strictness::Strict && issue.is_malformed() {
                    return Err(SchemaError::MalformedGenerator {
                        table: self.name.clone(),
                        column: column_cfg.name.clone(),
                        reason: issue.to_string(),
                    });
                }
                warnings.push(ConfigWarning {
                    table: self.name.clone(),
                    column: Some(column_cfg.name.clone()),
                    message: issue.to_string(),
                });
            }

            let mut column = Column::new(column_cfg.name.clone(), resolution.spec);
            if let Some(t) = &column_cfg.column_type {
                column = column.with_type(t.clone());
            }
            table.push_column(column);
        }

        Ok(table)
    }

    fn warning(&self, message: &str) -> ConfigWarning {
        ConfigWarning {
            table: self.name.clone(),
            column: None,
            message: message.to_string(),
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()),
        Some(ref ext) if ext == "yaml" || ext == "yml"
    )
}

/// Load, resolve and validate a configuration file in one step.
pub fn load_schema(path: &Path, strictness: Strictness) -> anyhow::Result<LoadedSchema> {
    let config = SchemaConfig::load(path)?;
    config
        .build(strictness)
        .with_context(|| format!("invalid schema in {}", path.display()))
}
