//! In-process sinks.

use super::{RowSink, SinkFactory};
use crate::error::SinkError;
use crate::schema::Table;

/// Header and rows captured for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOutput {
    pub table: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// How many times `write_header` was called
    pub header_writes: usize,
}

impl TableOutput {
    /// Values of `column` across all rows, in emission order.
    pub fn column_values(&self, column: &str) -> Vec<&str> {
        let Some(idx) = self.header.iter().position(|h| h == column) else {
            return Vec::new();
        };
        self.rows.iter().map(|r| r[idx].as_str()).collect()
    }
}

/// Sink that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    output: TableOutput,
}

impl MemorySink {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            output: TableOutput {
                table: table.into(),
                ..Default::default()
            },
        }
    }

    pub fn into_output(self) -> TableOutput {
        self.output
    }
}

impl RowSink for MemorySink {
    fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError> {
        self.output.header = columns.iter().map(|c| c.to_string()).collect();
        self.output.header_writes += 1;
        Ok(())
    }

    fn write_row(&mut self, values: &[String]) -> Result<(), SinkError> {
        self.output.rows.push(values.to_vec());
        Ok(())
    }
}

/// Collects closed [`MemorySink`]s in the order they were closed (schema order).
#[derive(Debug, Default)]
pub struct MemorySinkFactory {
    tables: Vec<TableOutput>,
}

impl MemorySinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tables(&self) -> &[TableOutput] {
        &self.tables
    }

    pub fn get(&self, table: &str) -> Option<&TableOutput> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn into_tables(self) -> Vec<TableOutput> {
        self.tables
    }
}

impl SinkFactory for MemorySinkFactory {
    type Sink = MemorySink;

    fn open(&mut self, table: &Table) -> Result<MemorySink, SinkError> {
        Ok(MemorySink::new(table.name.clone()))
    }

    fn close(&mut self, _table: &Table, sink: MemorySink) -> Result<(), SinkError> {
        self.tables.push(sink.into_output());
        Ok(())
    }
}

/// Sink that only counts rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSink {
    rows: u64,
}

impl DiscardSink {
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl RowSink for DiscardSink {
    fn write_header(&mut self, _columns: &[&str]) -> Result<(), SinkError> {
        Ok(())
    }

    fn write_row(&mut self, _values: &[String]) -> Result<(), SinkError> {
        self.rows += 1;
        Ok(())
    }
}

/// Factory for [`DiscardSink`], used for dry runs and benchmarks.
#[derive(Debug, Default)]
pub struct DiscardSinkFactory {
    rows: u64,
}

impl DiscardSinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows counted by every sink closed so far.
    pub fn rows(&self) -> u64 {
        self.rows
    }
}

impl SinkFactory for DiscardSinkFactory {
    type Sink = DiscardSink;

    fn open(&mut self, _table: &Table) -> Result<DiscardSink, SinkError> {
        Ok(DiscardSink::default())
    }

    fn close(&mut self, _table: &Table, sink: DiscardSink) -> Result<(), SinkError> {
        self.rows += sink.rows();
        Ok(())
    }
}
