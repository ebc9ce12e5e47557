//! Row sinks: where generated rows go.
//!
//! The walker only talks to [`RowSink`] and [`SinkFactory`]; persistence is
//! up to the implementation:
//! - `csv`: one delimited file per table
//! - `memory`: rows kept in memory, or counted and dropped

pub mod csv;
pub mod memory;

pub use self::csv::{CsvSinkFactory, CsvTableWriter};
pub use memory::{DiscardSink, DiscardSinkFactory, MemorySink, MemorySinkFactory, TableOutput};

use crate::error::SinkError;
use crate::schema::Table;

/// Receives the rows of exactly one table.
pub trait RowSink {
    /// Called once, before any row.
    fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError>;

    /// Called once per generated row, values in declared column order.
    fn write_row(&mut self, values: &[String]) -> Result<(), SinkError>;

    /// Flush anything buffered. Called by the default [`SinkFactory::close`].
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Opens and closes one sink per table.
pub trait SinkFactory {
    type Sink: RowSink;

    fn open(&mut self, table: &Table) -> Result<Self::Sink, SinkError>;

    /// Release a sink. Called for every opened sink, also when generation fails.
    fn close(&mut self, _table: &Table, mut sink: Self::Sink) -> Result<(), SinkError> {
        sink.finish()
    }
}
