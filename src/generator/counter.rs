//! Table-scoped auto-increment counters.

use crate::schema::Schema;
use ahash::AHashMap;

/// Run-lifetime counters keyed by table name.
///
/// Every row of a table draws from the same counter, whichever parent row it
/// was generated under. Counters start at 0 and are never reset during a run.
#[derive(Debug, Clone, Default)]
pub struct CounterStore {
    counters: AHashMap<String, u64>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with a zeroed counter for every table that has a
    /// `table_increment` column.
    pub fn for_schema(schema: &Schema) -> Self {
        let counters = schema
            .tables()
            .iter()
            .filter(|table| table.has_table_increment())
            .map(|table| (table.name.clone(), 0))
            .collect();
        Self { counters }
    }

    /// Return the current value for `table`, then advance it by one.
    pub fn next(&mut self, table: &str) -> u64 {
        if let Some(counter) = self.counters.get_mut(table) {
            let current = *counter;
            *counter += 1;
            return current;
        }
        self.counters.insert(table.to_string(), 1);
        0
    }

    /// Value the next call to [`CounterStore::next`] would return.
    pub fn peek(&self, table: &str) -> Option<u64> {
        self.counters.get(table).copied()
    }

    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }
}
