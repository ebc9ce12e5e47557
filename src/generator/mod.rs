//! Column value generation.
//!
//! [`generate_value`] maps a column's [`GeneratorSpec`] plus the row context to
//! a string. It never fails: anything it cannot resolve becomes `""`. The only
//! state it touches is the [`CounterStore`] (for `table_increment`) and the
//! random source (for `random`).

pub mod counter;
pub mod random;
pub mod spec;

pub use counter::CounterStore;
pub use spec::{GeneratorSpec, ResolveIssue, Resolution};

use crate::schema::Column;
use crate::walker::Row;
use rand::RngCore;

/// Where in the walk a value is being generated.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    /// Name of the table the row belongs to.
    pub table: &'a str,
    /// Position within the current batch. Restarts at 0 for every parent row.
    pub row_index: u64,
    /// The immediate parent row, if the table has a parent.
    pub parent: Option<&'a Row<'a>>,
}

impl<'a> RowContext<'a> {
    pub fn root(table: &'a str, row_index: u64) -> Self {
        Self {
            table,
            row_index,
            parent: None,
        }
    }

    pub fn child(table: &'a str, row_index: u64, parent: &'a Row<'a>) -> Self {
        Self {
            table,
            row_index,
            parent: Some(parent),
        }
    }
}

/// Produce the value for `column` in the row described by `ctx`.
pub fn generate_value(
    column: &Column,
    ctx: &RowContext<'_>,
    counters: &mut CounterStore,
    rng: &mut dyn RngCore,
) -> String {
    match &column.generator {
        GeneratorSpec::Hardcoded(value) => value.clone(),
        GeneratorSpec::Increment => (ctx.row_index + 1).to_string(),
        GeneratorSpec::TableIncrement => counters.next(ctx.table).to_string(),
        GeneratorSpec::ParentKey(parent_column) => ctx
            .parent
            .and_then(|parent| parent.get(parent_column))
            .unwrap_or_default()
            .to_string(),
        GeneratorSpec::Random {
            length,
            prefix,
            suffix,
        } => {
            let body = random::random_alphanumeric(rng, *length);
            let mut out = String::with_capacity(prefix.len() + body.len() + suffix.len());
            out.push_str(prefix);
            out.push_str(&body);
            out.push_str(suffix);
            out
        }
        GeneratorSpec::PredefinedList(items) => {
            if items.is_empty() {
                return String::new();
            }
            let idx = (ctx.row_index % items.len() as u64) as usize;
            items[idx].clone()
        }
        GeneratorSpec::Unrecognized => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, Table};
    use crate::walker::build_row;

    fn col(spec: GeneratorSpec) -> Column {
        Column::new("c", spec)
    }

    fn value(spec: GeneratorSpec, row_index: u64) -> String {
        let mut counters = CounterStore::new();
        let mut rng = random::seeded_rng(1);
        generate_value(
            &col(spec),
            &RowContext::root("t", row_index),
            &mut counters,
            &mut rng,
        )
    }

    #[test]
    fn test_hardcoded() {
        assert_eq!(value(GeneratorSpec::Hardcoded("lit".into()), 0), "lit");
        assert_eq!(value(GeneratorSpec::Hardcoded("lit".into()), 9), "lit");
    }

    #[test]
    fn test_increment_is_one_based() {
        assert_eq!(value(GeneratorSpec::Increment, 0), "1");
        assert_eq!(value(GeneratorSpec::Increment, 41), "42");
    }

    #[test]
    fn test_table_increment_uses_counter_store() {
        let mut counters = CounterStore::new();
        let mut rng = random::seeded_rng(1);
        let column = col(GeneratorSpec::TableIncrement);

        let values: Vec<String> = (0..3)
            .map(|_| {
                generate_value(
                    &column,
                    &RowContext::root("orders", 0),
                    &mut counters,
                    &mut rng,
                )
            })
            .collect();
        assert_eq!(values, vec!["0", "1", "2"]);
        assert_eq!(counters.peek("orders"), Some(3));
    }

    #[test]
    fn test_parent_key_without_parent_is_empty() {
        assert_eq!(value(GeneratorSpec::ParentKey("id".into()), 0), "");
    }

    #[test]
    fn test_parent_key_reads_parent_row() {
        let schema = Schema::new(vec![Table::new("users")
            .rows(1)
            .column(Column::new("id", GeneratorSpec::Hardcoded("u-7".into())))])
        .unwrap();
        let users = &schema.tables()[0];
        let mut counters = CounterStore::new();
        let mut rng = random::seeded_rng(1);
        let parent = build_row(users, 0, None, &mut counters, &mut rng);

        let found = generate_value(
            &col(GeneratorSpec::ParentKey("id".into())),
            &RowContext::child("orders", 0, &parent),
            &mut counters,
            &mut rng,
        );
        assert_eq!(found, "u-7");

        let missing = generate_value(
            &col(GeneratorSpec::ParentKey("nope".into())),
            &RowContext::child("orders", 0, &parent),
            &mut counters,
            &mut rng,
        );
        assert_eq!(missing, "");
    }

    #[test]
    fn test_random_prefix_and_length() {
        for i in 0..20 {
            let v = value(GeneratorSpec::random(5, "X-", ""), i);
            assert!(v.starts_with("X-"), "{}", v);
            assert_eq!(v.len(), 7);
            assert!(v[2..].bytes().all(|b| b.is_ascii_alphanumeric()));
        }
        let v = value(GeneratorSpec::random(3, "", "@x"), 0);
        assert!(v.ends_with("@x"));
        assert_eq!(v.len(), 5);
    }

    #[test]
    fn test_predefined_list_cycles() {
        let spec = GeneratorSpec::list(["a", "b", "c"]);
        let values: Vec<String> = (0..7).map(|i| value(spec.clone(), i)).collect();
        assert_eq!(values, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn test_empty_list_and_unrecognized_are_empty() {
        assert_eq!(value(GeneratorSpec::PredefinedList(vec![]), 3), "");
        assert_eq!(value(GeneratorSpec::Unrecognized, 0), "");
    }
}
