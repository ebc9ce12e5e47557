//! Seeded random schema shapes: forests of tables with varied depth and fan-out.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};

/// Bounds for [`random_schema`].
#[derive(Debug, Clone, Copy)]
pub struct ShapeLimits {
    pub max_tables: usize,
    pub max_depth: usize,
    /// Upper bound for root `rows`
    pub max_root_rows: u64,
    /// Upper bound for `rows_per_parent`
    pub max_fan_out: u64,
    /// Extra value columns per table on top of the key columns
    pub max_extra_columns: usize,
}

impl Default for ShapeLimits {
    fn default() -> Self {
        Self {
            max_tables: 8,
            max_depth: 4,
            max_root_rows: 5,
            max_fan_out: 3,
            max_extra_columns: 3,
        }
    }
}

/// A generated config document and the rows each table must receive.
#[derive(Debug, Clone)]
pub struct RandomSchema {
    pub config: Value,
    /// `(table, expected rows)` in declaration order
    pub expected_rows: Vec<(String, u64)>,
    /// `(table, parent)` for every child table
    pub parents: Vec<(String, String)>,
}

struct Node {
    name: String,
    parent: Option<usize>,
    depth: usize,
    count: u64,
}

/// Build a random, valid schema config from `seed`.
///
/// Every table has an `id` increment column and a `seq` table_increment
/// column; every child has a `parent_id` parent_key column pointing at its
/// parent's `id`. Tables are declared in shuffled order so children may
/// precede their parents. Zero counts are possible.
pub fn random_schema(seed: u64, limits: &ShapeLimits) -> RandomSchema {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let table_count = rng.random_range(1..=limits.max_tables.max(1));

    let mut nodes: Vec<Node> = Vec::with_capacity(table_count);
    for i in 0..table_count {
        let candidates: Vec<usize> = nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.depth + 1 < limits.max_depth)
            .map(|(idx, _)| idx)
            .collect();
        let parent = if i == 0 || candidates.is_empty() || rng.random_bool(0.3) {
            None
        } else {
            Some(candidates[rng.random_range(0..candidates.len())])
        };
        let (depth, count) = match parent {
            Some(p) => (nodes[p].depth + 1, rng.random_range(0..=limits.max_fan_out)),
            None => (0, rng.random_range(0..=limits.max_root_rows)),
        };
        nodes.push(Node {
            name: format!("t{}", i),
            parent,
            depth,
            count,
        });
    }

    // Nodes only point at earlier nodes, so one forward pass computes totals.
    let mut totals = vec![0u64; nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        totals[i] = match node.parent {
            Some(p) => totals[p] * node.count,
            None => node.count,
        };
    }

    let mut order: Vec<usize> = (0..nodes.len()).collect();
    for i in (1..order.len()).rev() {
        let j = rng.random_range(0..=i);
        order.swap(i, j);
    }

    let mut tables = Vec::with_capacity(nodes.len());
    for &idx in &order {
        let node = &nodes[idx];
        let mut columns = vec![
            json!({ "name": "id", "type": "int", "generator": { "increment": true } }),
            json!({ "name": "seq", "type": "int", "generator": { "table_increment": true } }),
        ];
        if node.parent.is_some() {
            columns.push(json!({ "name": "parent_id", "generator": { "parent_key": "id" } }));
        }
        let extra = rng.random_range(0..=limits.max_extra_columns);
        for c in 0..extra {
            columns.push(extra_column(&mut rng, c));
        }

        let mut table = json!({ "name": node.name, "columns": columns });
        match node.parent {
            Some(p) => {
                table["parent"] = json!(nodes[p].name);
                table["rows_per_parent"] = json!(node.count);
            }
            None => table["rows"] = json!(node.count),
        }
        tables.push(table);
    }

    RandomSchema {
        config: json!({ "tables": tables }),
        expected_rows: order
            .iter()
            .map(|&i| (nodes[i].name.clone(), totals[i]))
            .collect(),
        parents: order
            .iter()
            .filter_map(|&i| {
                nodes[i]
                    .parent
                    .map(|p| (nodes[i].name.clone(), nodes[p].name.clone()))
            })
            .collect(),
    }
}

fn extra_column(rng: &mut ChaCha8Rng, index: usize) -> Value {
    let name = format!("c{}", index);
    match rng.random_range(0..4) {
        0 => json!({ "name": name, "generator": { "hardcoded": "fixed" } }),
        1 => json!({
            "name": name,
            "generator": { "random": { "length": rng.random_range(0..12u32), "prefix": "r-" } }
        }),
        2 => json!({ "name": name, "generator": { "predefined_list": ["a", "b", "c"] } }),
        _ => json!({ "name": name, "generator": { "increment": true } }),
    }
}
