//! Validated, strongly-typed table schema.
//!
//! This module provides:
//! - Data models for tables, columns and their generators
//! - Load-time validation: unique names, known parents, acyclic parent graph
//! - Hierarchy queries used by the walker (roots, children, expected row totals)

mod graph;

pub use graph::*;

use crate::error::SchemaError;
use crate::generator::GeneratorSpec;
use ahash::{AHashMap, AHashSet};

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Informational type from the config (`"type"`), not used for generation
    pub declared_type: Option<String>,
    pub generator: GeneratorSpec,
}

impl Column {
    pub fn new(name: impl Into<String>, generator: GeneratorSpec) -> Self {
        Self {
            name: name.into(),
            declared_type: None,
            generator,
        }
    }

    pub fn with_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }
}

/// Table definition
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    /// Parent table name; `None` for root tables
    pub parent: Option<String>,
    /// Rows to generate (root tables only)
    pub row_count: u64,
    /// Rows to generate for every parent row (child tables only)
    pub rows_per_parent: u64,
    columns: Vec<Column>,
    column_index: AHashMap<String, usize>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            row_count: 0,
            rows_per_parent: 0,
            columns: Vec::new(),
            column_index: AHashMap::new(),
        }
    }

    pub fn child_of(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn rows(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn rows_per_parent(mut self, rows_per_parent: u64) -> Self {
        self.rows_per_parent = rows_per_parent;
        self
    }

    pub fn column(mut self, column: Column) -> Self {
        self.push_column(column);
        self
    }

    pub fn push_column(&mut self, column: Column) {
        // First declaration keeps the name; duplicates are rejected by Schema::new
        self.column_index
            .entry(column.name.clone())
            .or_insert(self.columns.len());
        self.columns.push(column);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in declared order, i.e. the header row.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.column_index(name).map(|i| &self.columns[i])
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Rows produced per invocation: `row_count` for roots,
    /// `rows_per_parent` for children.
    pub fn batch_size(&self) -> u64 {
        if self.is_root() {
            self.row_count
        } else {
            self.rows_per_parent
        }
    }

    pub fn has_table_increment(&self) -> bool {
        self.columns
            .iter()
            .any(|c| c.generator == GeneratorSpec::TableIncrement)
    }

    fn duplicate_column(&self) -> Option<&str> {
        let mut seen = AHashSet::new();
        self.columns
            .iter()
            .map(|c| c.name.as_str())
            .find(|name| !seen.insert(*name))
    }
}

/// A `parent_key` column pointing at a column its parent table does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingParentKey {
    pub table: String,
    pub column: String,
    pub parent: String,
    pub parent_column: String,
}

/// An ordered, validated set of tables.
#[derive(Debug, Clone)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    /// Validate `tables` and build a schema.
    ///
    /// Rejects empty or duplicate table names, duplicate column names, unknown
    /// parents and cyclic parent chains.
    pub fn new(tables: Vec<Table>) -> Result<Self, SchemaError> {
        let mut names = AHashSet::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            if table.name.is_empty() {
                return Err(SchemaError::EmptyTableName(i + 1));
            }
            if !names.insert(table.name.as_str()) {
                return Err(SchemaError::DuplicateTable(table.name.clone()));
            }
            if let Some(column) = table.duplicate_column() {
                return Err(SchemaError::DuplicateColumn {
                    table: table.name.clone(),
                    column: column.to_string(),
                });
            }
        }

        for table in &tables {
            if let Some(parent) = &table.parent {
                if !names.contains(parent.as_str()) {
                    return Err(SchemaError::UnknownParent {
                        table: table.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        let graph = ParentGraph::from_tables(&tables);
        if let Some(cycle) = graph.find_cycle() {
            return Err(SchemaError::Cycle(
                cycle.into_iter().map(|i| tables[i].name.clone()).collect(),
            ));
        }

        Ok(Self { tables })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_index(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|t| t.name == name)
    }

    /// Root tables in declaration order, with their schema index.
    pub fn roots(&self) -> impl Iterator<Item = (usize, &Table)> {
        self.tables.iter().enumerate().filter(|(_, t)| t.is_root())
    }

    /// Direct children of `parent` in declaration order, with their schema index.
    pub fn children_of<'a>(&'a self, parent: &'a str) -> impl Iterator<Item = (usize, &'a Table)> {
        self.tables
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.parent.as_deref() == Some(parent))
    }

    pub fn graph(&self) -> ParentGraph {
        ParentGraph::from_tables(&self.tables)
    }

    /// Total rows each table will receive, in schema order.
    ///
    /// Roots get `row_count`; children get their parent's total times
    /// `rows_per_parent` (saturating).
    pub fn expected_row_counts(&self) -> Vec<(&str, u64)> {
        let graph = self.graph();
        let mut totals = vec![0u64; self.tables.len()];
        for idx in graph.topo_sort().order {
            let table = &self.tables[idx];
            totals[idx] = match graph.parent_of(idx) {
                Some(p) => totals[p].saturating_mul(table.rows_per_parent),
                None => table.row_count,
            };
        }
        self.tables
            .iter()
            .zip(totals)
            .map(|(t, n)| (t.name.as_str(), n))
            .collect()
    }

    /// `parent_key` columns that can only ever produce `""`.
    pub fn dangling_parent_keys(&self) -> Vec<DanglingParentKey> {
        let mut dangling = Vec::new();
        for table in &self.tables {
            for column in table.columns() {
                let GeneratorSpec::ParentKey(parent_column) = &column.generator else {
                    continue;
                };
                let parent = table.parent.as_deref().and_then(|p| self.get(p));
                let resolved = parent.is_some_and(|p| p.column_index(parent_column).is_some());
                if !resolved {
                    dangling.push(DanglingParentKey {
                        table: table.name.clone(),
                        column: column.name.clone(),
                        parent: table.parent.clone().unwrap_or_default(),
                        parent_column: parent_column.clone(),
                    });
                }
            }
        }
        dangling
    }
}
