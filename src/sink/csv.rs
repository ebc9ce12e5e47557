//! Delimited-file sink: one file per table.

use super::{RowSink, SinkFactory};
use crate::error::SinkError;
use crate::schema::Table;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const WRITER_BUFFER_SIZE: usize = 256 * 1024;
pub const DEFAULT_DELIMITER: u8 = b',';

pub struct CsvTableWriter {
    writer: ::csv::Writer<File>,
    path: PathBuf,
    rows_written: u64,
}

impl CsvTableWriter {
    pub fn new(filename: &Path, delimiter: u8) -> Result<Self, SinkError> {
        let writer = ::csv::WriterBuilder::new()
            .delimiter(delimiter)
            .buffer_capacity(WRITER_BUFFER_SIZE)
            .from_path(filename)?;

        Ok(Self {
            writer,
            path: filename.to_path_buf(),
            rows_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl RowSink for CsvTableWriter {
    fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError> {
        self.writer.write_record(columns)?;
        Ok(())
    }

    fn write_row(&mut self, values: &[String]) -> Result<(), SinkError> {
        self.writer.write_record(values)?;
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// A file produced by [`CsvSinkFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub table: String,
    pub path: PathBuf,
    pub rows: u64,
}

/// Creates `<output_dir>/<table>.csv` (or `.tsv` for tab delimiters) per table.
pub struct CsvSinkFactory {
    output_dir: PathBuf,
    delimiter: u8,
    written: Vec<WrittenFile>,
}

impl CsvSinkFactory {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            delimiter: DEFAULT_DELIMITER,
            written: Vec::new(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn ensure_output_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.output_dir)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn extension(&self) -> &'static str {
        if self.delimiter == b'\t' {
            "tsv"
        } else {
            "csv"
        }
    }

    pub fn file_path(&self, table_name: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", table_name, self.extension()))
    }

    /// Files closed so far, in schema order.
    pub fn written_files(&self) -> &[WrittenFile] {
        &self.written
    }
}

impl SinkFactory for CsvSinkFactory {
    type Sink = CsvTableWriter;

    fn open(&mut self, table: &Table) -> Result<CsvTableWriter, SinkError> {
        self.ensure_output_dir()?;
        let path = self.file_path(&table.name);
        debug!(table = %table.name, path = %path.display(), "opening output file");
        CsvTableWriter::new(&path, self.delimiter)
    }

    fn close(&mut self, table: &Table, mut writer: CsvTableWriter) -> Result<(), SinkError> {
        writer.finish()?;
        debug!(
            table = %table.name,
            rows = writer.rows_written(),
            "closed output file"
        );
        self.written.push(WrittenFile {
            table: table.name.clone(),
            path: writer.path.clone(),
            rows: writer.rows_written(),
        });
        Ok(())
    }
}
