//! Error types for schema loading and row generation.

use thiserror::Error;

/// Problems found while turning a configuration into a [`crate::schema::Schema`].
///
/// All of these are detected before any output is opened.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("table name must not be empty (table #{0})")]
    EmptyTableName(usize),

    #[error("duplicate table name '{0}'")]
    DuplicateTable(String),

    #[error("table '{table}': duplicate column name '{column}'")]
    DuplicateColumn { table: String, column: String },

    #[error("table '{table}' references unknown parent table '{parent}'")]
    UnknownParent { table: String, parent: String },

    #[error("cyclic parent relationship between tables: {}", .0.join(", "))]
    Cycle(Vec<String>),

    #[error("table '{table}', column '{column}': malformed generator: {reason}")]
    MalformedGenerator {
        table: String,
        column: String,
        reason: String,
    },
}

/// Failure inside a row sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure during a generation run. Always names the table whose sink failed.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to open output for table '{table}': {source}")]
    Open {
        table: String,
        #[source]
        source: SinkError,
    },

    #[error("failed to write row for table '{table}': {source}")]
    Write {
        table: String,
        #[source]
        source: SinkError,
    },

    #[error("failed to close output for table '{table}': {source}")]
    Close {
        table: String,
        #[source]
        source: SinkError,
    },
}

impl GenerateError {
    /// Name of the table whose sink failed.
    pub fn table(&self) -> &str {
        match self {
            GenerateError::Open { table, .. }
            | GenerateError::Write { table, .. }
            | GenerateError::Close { table, .. } => table,
        }
    }
}
