//! Relationally-consistent CSV fixture generation.
//!
//! A [`Schema`] of root and child tables is walked depth-first: every row of a
//! root table is followed by the rows of its child tables, which can copy
//! values from that parent row. Rows go to a [`sink::RowSink`] per table.
//!
//! # Example
//!
//! ```rust
//! use fixture_forge::config::{SchemaConfig, Strictness};
//! use fixture_forge::progress::NoProgress;
//! use fixture_forge::sink::MemorySinkFactory;
//! use fixture_forge::Generator;
//!
//! let config = SchemaConfig::from_json_str(r#"{"tables": [
//!     {"name": "users", "rows": 2,
//!      "columns": [{"name": "id", "generator": {"increment": true}}]},
//!     {"name": "orders", "parent": "users", "rows_per_parent": 2,
//!      "columns": [{"name": "user_id", "generator": {"parent_key": "id"}}]}
//! ]}"#).unwrap();
//! let schema = config.build(Strictness::Lenient).unwrap().schema;
//!
//! let mut sinks = MemorySinkFactory::new();
//! let stats = Generator::new(&schema)
//!     .with_seed(42)
//!     .run(&mut sinks, &mut NoProgress)
//!     .unwrap();
//!
//! assert_eq!(stats.rows_for("orders"), Some(4));
//! assert_eq!(sinks.get("orders").unwrap().column_values("user_id"), vec!["1", "1", "2", "2"]);
//! ```

// Allow dead code for items that are part of the public API but only used in tests
#![allow(dead_code)]

pub mod config;
pub mod error;
pub mod generator;
pub mod progress;
pub mod schema;
pub mod sink;
pub mod walker;

pub use error::{GenerateError, SchemaError, SinkError};
pub use generator::{CounterStore, GeneratorSpec};
pub use schema::{Column, Schema, Table};
pub use walker::{generate, GenerationStats, Generator, Row, TableStats};
