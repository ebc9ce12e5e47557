//! Hierarchy walker: drives a full generation run.
//!
//! For every root table, in declaration order, `row_count` rows are built and
//! written. After each row, every direct child table produces its
//! `rows_per_parent` rows with that row as parent context, recursively.
//! Roots and children share one routine; they only differ in how many rows
//! to produce and which parent row to pass down.
//!
//! `increment` restarts with every batch, `table_increment` never does.

mod row;

pub use row::{build_row, Row};

use crate::error::{GenerateError, SinkError};
use crate::generator::random::{seeded_rng, time_seed};
use crate::generator::CounterStore;
use crate::progress::GenerationObserver;
use crate::schema::{Schema, Table};
use crate::sink::{RowSink, SinkFactory};
use rand::RngCore;
use schemars::JsonSchema;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Rows emitted for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TableStats {
    pub name: String,
    pub rows: u64,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct GenerationStats {
    /// Seed of the random source; rerun with it to reproduce `random` columns
    pub seed: u64,
    /// Per-table row counts in schema order
    pub tables: Vec<TableStats>,
    pub total_rows: u64,
}

impl GenerationStats {
    pub fn rows_for(&self, table: &str) -> Option<u64> {
        self.tables.iter().find(|t| t.name == table).map(|t| t.rows)
    }
}

/// Generation run configuration.
pub struct Generator<'s> {
    schema: &'s Schema,
    seed: u64,
}

impl<'s> Generator<'s> {
    /// Generator seeded from the current time.
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            seed: time_seed(),
        }
    }

    /// Pin the random source.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate every table into sinks opened by `factory`.
    ///
    /// All sinks are opened (and receive their header) before the first row.
    /// Every opened sink is closed again, whether or not generation succeeds.
    pub fn run<F, O>(
        &self,
        factory: &mut F,
        observer: &mut O,
    ) -> Result<GenerationStats, GenerateError>
    where
        F: SinkFactory,
        O: GenerationObserver + ?Sized,
    {
        let tables = self.schema.tables();
        debug!(seed = self.seed, tables = tables.len(), "starting generation");

        let mut sinks = Vec::with_capacity(tables.len());
        for table in tables {
            match open_sink(factory, table) {
                Ok(sink) => sinks.push(sink),
                Err(e) => {
                    close_quietly(factory, tables, sinks);
                    return Err(e);
                }
            }
        }

        let mut rng = seeded_rng(self.seed);
        let mut walk = Walk {
            schema: self.schema,
            sinks,
            counters: CounterStore::for_schema(self.schema),
            rng: &mut rng,
            observer,
            emitted: vec![0; tables.len()],
        };
        let result = walk.run_roots();
        let Walk { sinks, emitted, .. } = walk;

        if let Err(e) = result {
            close_quietly(factory, tables, sinks);
            return Err(e);
        }

        let mut first_error = None;
        for (table, sink) in tables.iter().zip(sinks) {
            if let Err(source) = factory.close(table, sink) {
                warn!(table = %table.name, error = %source, "failed to close output");
                first_error.get_or_insert(GenerateError::Close {
                    table: table.name.clone(),
                    source,
                });
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let stats = GenerationStats {
            seed: self.seed,
            total_rows: emitted.iter().sum(),
            tables: tables
                .iter()
                .zip(emitted)
                .map(|(t, rows)| TableStats {
                    name: t.name.clone(),
                    rows,
                })
                .collect(),
        };
        info!(
            total_rows = stats.total_rows,
            tables = stats.tables.len(),
            "generation finished"
        );
        Ok(stats)
    }
}

/// Generate `schema` with a time-seeded random source.
pub fn generate<F, O>(
    schema: &Schema,
    factory: &mut F,
    observer: &mut O,
) -> Result<GenerationStats, GenerateError>
where
    F: SinkFactory,
    O: GenerationObserver + ?Sized,
{
    Generator::new(schema).run(factory, observer)
}

fn open_sink<F: SinkFactory>(factory: &mut F, table: &Table) -> Result<F::Sink, GenerateError> {
    let open_err = |source: SinkError| GenerateError::Open {
        table: table.name.clone(),
        source,
    };
    let mut sink = factory.open(table).map_err(open_err)?;
    if let Err(source) = sink.write_header(&table.column_names()) {
        // Still hand the sink back so its resources are released.
        if let Err(e) = factory.close(table, sink) {
            warn!(table = %table.name, error = %e, "failed to close output after header error");
        }
        return Err(open_err(source));
    }
    Ok(sink)
}

/// Best-effort close on the failure path; the triggering error is returned.
fn close_quietly<F: SinkFactory>(factory: &mut F, tables: &[Table], sinks: Vec<F::Sink>) {
    for (table, sink) in tables.iter().zip(sinks) {
        if let Err(e) = factory.close(table, sink) {
            warn!(table = %table.name, error = %e, "failed to close output after error");
        }
    }
}

struct Walk<'s, 'r, S, O: ?Sized> {
    schema: &'s Schema,
    /// One sink per table, aligned with `schema.tables()`
    sinks: Vec<S>,
    counters: CounterStore,
    rng: &'r mut dyn RngCore,
    observer: &'r mut O,
    emitted: Vec<u64>,
}

impl<'s, S, O> Walk<'s, '_, S, O>
where
    S: RowSink,
    O: GenerationObserver + ?Sized,
{
    fn run_roots(&mut self) -> Result<(), GenerateError> {
        let schema = self.schema;
        for (idx, table) in schema.roots() {
            debug!(table = %table.name, rows = table.row_count, "generating root table");
            self.observer.root_started(table);
            let rows = self.emit_rows(idx, table.row_count, None)?;
            self.observer.root_finished(table, rows);
        }
        Ok(())
    }

    /// Emit `count` rows of table `idx` under `parent`, each followed by its
    /// descendants. Returns rows written for the whole subtree.
    fn emit_rows(
        &mut self,
        idx: usize,
        count: u64,
        parent: Option<&Row<'s>>,
    ) -> Result<u64, GenerateError> {
        let schema = self.schema;
        let table = &schema.tables()[idx];
        let mut subtree_rows = 0;

        for row_index in 0..count {
            let row = build_row(table, row_index, parent, &mut self.counters, &mut *self.rng);

            self.sinks[idx]
                .write_row(row.values())
                .map_err(|source| GenerateError::Write {
                    table: table.name.clone(),
                    source,
                })?;
            self.emitted[idx] += 1;
            subtree_rows += 1;
            self.observer.row_emitted(&table.name);

            for (child_idx, child) in schema.children_of(&table.name) {
                subtree_rows += self.emit_rows(child_idx, child.rows_per_parent, Some(&row))?;
            }
        }

        Ok(subtree_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorSpec;
    use crate::progress::NoProgress;
    use crate::schema::Column;
    use crate::sink::{MemorySink, MemorySinkFactory};

    fn users_orders(extra_order_columns: Vec<Column>) -> Schema {
        let mut orders = Table::new("orders")
            .child_of("users")
            .rows_per_parent(2)
            .column(Column::new("order_id", GeneratorSpec::Increment))
            .column(Column::new("user_id", GeneratorSpec::ParentKey("id".into())));
        for column in extra_order_columns {
            orders.push_column(column);
        }
        Schema::new(vec![
            Table::new("users")
                .rows(2)
                .column(Column::new("id", GeneratorSpec::Increment)),
            orders,
        ])
        .unwrap()
    }

    fn run(schema: &Schema) -> (MemorySinkFactory, GenerationStats) {
        let mut factory = MemorySinkFactory::new();
        let stats = Generator::new(schema)
            .with_seed(7)
            .run(&mut factory, &mut NoProgress)
            .unwrap();
        (factory, stats)
    }

    #[test]
    fn test_users_orders_example() {
        let schema = users_orders(vec![]);
        let (out, stats) = run(&schema);

        let users = out.get("users").unwrap();
        assert_eq!(users.header, vec!["id"]);
        assert_eq!(users.rows, vec![vec!["1"], vec!["2"]]);

        let orders = out.get("orders").unwrap();
        assert_eq!(orders.header, vec!["order_id", "user_id"]);
        assert_eq!(
            orders.rows,
            vec![
                vec!["1", "1"],
                vec!["2", "1"],
                vec!["1", "2"],
                vec!["2", "2"],
            ]
        );

        assert_eq!(stats.rows_for("users"), Some(2));
        assert_eq!(stats.rows_for("orders"), Some(4));
        assert_eq!(stats.total_rows, 6);
        assert_eq!(stats.seed, 7);
    }

    #[test]
    fn test_table_increment_shared_across_parents() {
        let schema = users_orders(vec![Column::new("seq", GeneratorSpec::TableIncrement)]);
        let (out, _) = run(&schema);
        assert_eq!(
            out.get("orders").unwrap().column_values("seq"),
            vec!["0", "1", "2", "3"]
        );
    }

    #[test]
    fn test_grandchildren_restart_increment_per_parent() {
        let schema = Schema::new(vec![
            Table::new("a")
                .rows(2)
                .column(Column::new("id", GeneratorSpec::Increment)),
            Table::new("b")
                .child_of("a")
                .rows_per_parent(2)
                .column(Column::new("id", GeneratorSpec::TableIncrement))
                .column(Column::new("a_id", GeneratorSpec::ParentKey("id".into()))),
            Table::new("c")
                .child_of("b")
                .rows_per_parent(3)
                .column(Column::new("n", GeneratorSpec::Increment))
                .column(Column::new("b_id", GeneratorSpec::ParentKey("id".into())))
                .column(Column::new("a_id", GeneratorSpec::ParentKey("a_id".into()))),
        ])
        .unwrap();
        let (out, stats) = run(&schema);

        let c = out.get("c").unwrap();
        assert_eq!(c.rows.len(), 12);
        assert_eq!(
            c.column_values("n"),
            vec!["1", "2", "3", "1", "2", "3", "1", "2", "3", "1", "2", "3"]
        );
        assert_eq!(
            c.column_values("b_id"),
            vec!["0", "0", "0", "1", "1", "1", "2", "2", "2", "3", "3", "3"]
        );
        // ParentKey only sees the immediate parent; b copied a.id into a_id.
        assert_eq!(
            c.column_values("a_id"),
            vec!["1", "1", "1", "1", "1", "1", "2", "2", "2", "2", "2", "2"]
        );
        assert_eq!(stats.total_rows, 2 + 4 + 12);
    }

    #[test]
    fn test_multiple_children_each_get_their_rows() {
        let schema = Schema::new(vec![
            Table::new("users")
                .rows(3)
                .column(Column::new("id", GeneratorSpec::Increment)),
            Table::new("orders")
                .child_of("users")
                .rows_per_parent(2)
                .column(Column::new("uid", GeneratorSpec::ParentKey("id".into()))),
            Table::new("addresses")
                .child_of("users")
                .rows_per_parent(1)
                .column(Column::new("uid", GeneratorSpec::ParentKey("id".into()))),
        ])
        .unwrap();
        let (out, _) = run(&schema);
        assert_eq!(
            out.get("orders").unwrap().column_values("uid"),
            vec!["1", "1", "2", "2", "3", "3"]
        );
        assert_eq!(
            out.get("addresses").unwrap().column_values("uid"),
            vec!["1", "2", "3"]
        );
    }

    #[test]
    fn test_every_table_gets_one_header_even_with_zero_rows() {
        let schema = Schema::new(vec![
            Table::new("empty").column(Column::new("x", GeneratorSpec::Increment)),
            Table::new("child")
                .child_of("empty")
                .rows_per_parent(5)
                .column(Column::new("y", GeneratorSpec::Increment)),
        ])
        .unwrap();
        let (out, stats) = run(&schema);
        assert_eq!(out.tables().len(), 2);
        for table in out.tables() {
            assert_eq!(table.header_writes, 1);
            assert!(table.rows.is_empty());
        }
        assert_eq!(stats.total_rows, 0);
    }

    #[test]
    fn test_same_seed_same_random_values() {
        let schema = users_orders(vec![Column::new("token", GeneratorSpec::random(8, "", ""))]);
        let (a, _) = run(&schema);
        let (b, _) = run(&schema);
        assert_eq!(a.get("orders"), b.get("orders"));
    }

    #[test]
    fn test_observer_sees_every_row_in_order() {
        let schema = users_orders(vec![]);
        let mut seen: Vec<String> = Vec::new();
        let mut observer = |table: &str| seen.push(table.to_string());
        let mut factory = MemorySinkFactory::new();
        generate(&schema, &mut factory, &mut observer).unwrap();
        assert_eq!(
            seen,
            vec!["users", "orders", "orders", "users", "orders", "orders"]
        );
    }

    struct FailingFactory {
        fail_on_row: usize,
        closed: Vec<String>,
    }

    struct FailingSink {
        inner: MemorySink,
        remaining: usize,
    }

    impl RowSink for FailingSink {
        fn write_header(&mut self, columns: &[&str]) -> Result<(), SinkError> {
            self.inner.write_header(columns)
        }

        fn write_row(&mut self, values: &[String]) -> Result<(), SinkError> {
            if self.remaining == 0 {
                return Err(SinkError::Io(std::io::Error::other("disk full")));
            }
            self.remaining -= 1;
            self.inner.write_row(values)
        }
    }

    impl SinkFactory for FailingFactory {
        type Sink = FailingSink;

        fn open(&mut self, table: &Table) -> Result<FailingSink, SinkError> {
            Ok(FailingSink {
                inner: MemorySink::new(table.name.clone()),
                remaining: self.fail_on_row,
            })
        }

        fn close(&mut self, table: &Table, _sink: FailingSink) -> Result<(), SinkError> {
            self.closed.push(table.name.clone());
            Ok(())
        }
    }

    #[test]
    fn test_sink_error_aborts_and_closes_all_sinks() {
        let schema = users_orders(vec![]);
        let mut factory = FailingFactory {
            fail_on_row: 1,
            closed: Vec::new(),
        };
        let err = Generator::new(&schema)
            .run(&mut factory, &mut NoProgress)
            .unwrap_err();

        // One row per sink is allowed: users#1 and orders#1 succeed, orders#2 fails.
        assert!(matches!(err, GenerateError::Write { .. }));
        assert_eq!(err.table(), "orders");
        assert_eq!(factory.closed, vec!["users", "orders"]);
    }

    struct BrokenHeaderFactory {
        closed: Vec<String>,
    }

    struct BrokenHeaderSink;

    impl RowSink for BrokenHeaderSink {
        fn write_header(&mut self, _columns: &[&str]) -> Result<(), SinkError> {
            Err(SinkError::Io(std::io::Error::other("read-only file system")))
        }

        fn write_row(&mut self, _values: &[String]) -> Result<(), SinkError> {
            Ok(())
        }
    }

    impl SinkFactory for BrokenHeaderFactory {
        type Sink = BrokenHeaderSink;

        fn open(&mut self, _table: &Table) -> Result<BrokenHeaderSink, SinkError> {
            Ok(BrokenHeaderSink)
        }

        fn close(&mut self, table: &Table, _sink: BrokenHeaderSink) -> Result<(), SinkError> {
            self.closed.push(table.name.clone());
            Err(SinkError::Io(std::io::Error::other("close failed")))
        }
    }

    #[test]
    fn test_header_error_still_closes_sink_and_reports_open() {
        let schema = users_orders(vec![]);
        let mut factory = BrokenHeaderFactory { closed: Vec::new() };
        let err = Generator::new(&schema)
            .run(&mut factory, &mut NoProgress)
            .unwrap_err();

        // The failing close is logged, not returned.
        assert!(matches!(err, GenerateError::Open { .. }));
        assert_eq!(err.table(), "users");
        assert_eq!(factory.closed, vec!["users"]);
    }
}
