//! Parent graph for the table hierarchy.
//!
//! Provides:
//! - Parent/children adjacency built from each table's `parent`
//! - Topological sorting (parents before children)
//! - Cycle detection, so a cyclic schema is rejected instead of recursing forever

use super::Table;
use ahash::AHashMap;
use std::collections::VecDeque;

/// Parent → child relationships between tables, by position in the schema.
#[derive(Debug)]
pub struct ParentGraph {
    /// For each table, the index of its parent table
    parent: Vec<Option<usize>>,
    /// For each table, the indices of its direct children in declaration order
    children: Vec<Vec<usize>>,
}

/// Result of topological sort
#[derive(Debug)]
pub struct TopoSortResult {
    /// Tables in topological order (parents before children)
    pub order: Vec<usize>,
    /// Tables on or below a cycle (could not be ordered)
    pub cyclic_tables: Vec<usize>,
}

impl ParentGraph {
    /// Build the graph. Parents that name no table are left unlinked; callers
    /// report those separately.
    pub fn from_tables(tables: &[Table]) -> Self {
        let index: AHashMap<&str, usize> = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.as_str(), i))
            .collect();

        let mut parent = vec![None; tables.len()];
        let mut children = vec![Vec::new(); tables.len()];

        for (i, table) in tables.iter().enumerate() {
            if let Some(p) = table.parent.as_deref().and_then(|name| index.get(name)) {
                parent[i] = Some(*p);
                children[*p].push(i);
            }
        }

        Self { parent, children }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        self.parent.get(idx).copied().flatten()
    }

    pub fn children_of(&self, idx: usize) -> &[usize] {
        self.children.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Perform topological sort using Kahn's algorithm.
    pub fn topo_sort(&self) -> TopoSortResult {
        let n = self.len();

        // Every table has at most one parent
        let mut in_degree: Vec<usize> = self.parent.iter().map(|p| p.is_some() as usize).collect();

        let mut queue: VecDeque<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &deg)| deg == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(n);

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &child in &self.children[idx] {
                in_degree[child] -= 1;
                if in_degree[child] == 0 {
                    queue.push_back(child);
                }
            }
        }

        let cyclic_tables = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &deg)| deg > 0)
            .map(|(i, _)| i)
            .collect();

        TopoSortResult {
            order,
            cyclic_tables,
        }
    }

    /// Members of the first parent cycle found, in parent-chain order.
    ///
    /// Tables that merely hang below a cycle are not included.
    pub fn find_cycle(&self) -> Option<Vec<usize>> {
        let result = self.topo_sort();
        let start = *result.cyclic_tables.first()?;

        // Walking parent links from any unordered table must end in a cycle.
        let mut seen = vec![false; self.len()];
        let mut current = start;
        while !seen[current] {
            seen[current] = true;
            current = self.parent_of(current)?;
        }

        let mut cycle = vec![current];
        let mut next = self.parent_of(current)?;
        while next != current {
            cycle.push(next);
            next = self.parent_of(next)?;
        }
        Some(cycle)
    }

    /// Number of ancestors above `idx`. Only meaningful for acyclic graphs.
    pub fn depth(&self, idx: usize) -> usize {
        let mut depth = 0;
        let mut current = idx;
        while let Some(p) = self.parent_of(current) {
            depth += 1;
            current = p;
            if depth > self.len() {
                break;
            }
        }
        depth
    }
}
