//! Deterministic schema configs for fixture-forge integration tests and benchmarks.
//!
//! Produces config documents as `serde_json::Value`, so tests can write them
//! to disk or feed them straight to the config loader.
//!
//! # Example
//!
//! ```rust
//! use fixture_schemas::{ecommerce, random_schema, Scale, ShapeLimits};
//!
//! let shop = ecommerce(Scale::Small);
//! assert_eq!(shop["tables"].as_array().unwrap().len(), 5);
//!
//! let shape = random_schema(42, &ShapeLimits::default());
//! assert!(!shape.expected_rows.is_empty());
//! ```

pub mod scale;
pub mod shapes;

pub use scale::{ecommerce, Scale};
pub use shapes::{random_schema, RandomSchema, ShapeLimits};
