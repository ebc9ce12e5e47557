//! Progress reporting for generation runs.
//!
//! The walker reports through [`GenerationObserver`]. Observation has no
//! effect on what is generated. Any `FnMut(&str)` closure is an observer that
//! receives the table name of every emitted row.

use crate::schema::Table;
use indicatif::{ProgressBar, ProgressStyle};

pub trait GenerationObserver {
    /// A root table is about to be generated (with all of its descendants).
    fn root_started(&mut self, _table: &Table) {}

    /// One row of `table` was written to its sink.
    fn row_emitted(&mut self, table: &str);

    /// A root table and its descendants are done; `rows` counts the whole subtree.
    fn root_finished(&mut self, _table: &Table, _rows: u64) {}
}

impl<F> GenerationObserver for F
where
    F: FnMut(&str),
{
    fn row_emitted(&mut self, table: &str) {
        self(table)
    }
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl GenerationObserver for NoProgress {
    fn row_emitted(&mut self, _table: &str) {}
}

/// Terminal reporter: one bar per root table, advanced once per root row.
pub struct ProgressReporter {
    show_bar: bool,
    quiet: bool,
    current_root: Option<String>,
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// `show_bar` enables the bars; `quiet` also suppresses the
    /// per-table status lines (used with `--json`).
    pub fn new(show_bar: bool, quiet: bool) -> Self {
        Self {
            show_bar: show_bar && !quiet,
            quiet,
            current_root: None,
            bar: None,
        }
    }

    fn new_bar(table: &Table) -> ProgressBar {
        let pb = ProgressBar::new(table.row_count);
        let style = ProgressStyle::with_template(
            "{msg} [{elapsed_precise}] [{bar:20.cyan/blue}] {pos}/{len} ({percent}%)",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ");
        pb.set_style(style);
        pb.set_message(format!("Table: {}", table.name));
        pb
    }
}

impl GenerationObserver for ProgressReporter {
    fn root_started(&mut self, table: &Table) {
        if !self.quiet {
            println!(
                "Generating data for table (including child): {} ({} rows)",
                table.name, table.row_count
            );
        }
        self.current_root = Some(table.name.clone());
        if self.show_bar {
            self.bar = Some(Self::new_bar(table));
        }
    }

    fn row_emitted(&mut self, table: &str) {
        if self.current_root.as_deref() == Some(table) {
            if let Some(pb) = &self.bar {
                pb.inc(1);
            }
        }
    }

    fn root_finished(&mut self, table: &Table, _rows: u64) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
        self.current_root = None;
        if !self.quiet {
            println!("Completed data generation for table: {}", table.name);
        }
    }
}
