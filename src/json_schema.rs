//! JSON Schema generation for the config format and `--json` outputs.
//!
//! Schemas are generated with schemars and exported via the `schema` subcommand.

use schemars::{schema_for, Schema};
use std::collections::BTreeMap;

/// Every exported schema by name.
/// BTreeMap keeps the output order stable (diffable).
pub fn all_schemas() -> BTreeMap<&'static str, Schema> {
    let mut schemas = BTreeMap::new();

    // config file format (input)
    schemas.insert("config", schema_for!(crate::config::SchemaConfig));

    // generate --json
    schemas.insert(
        "generate",
        schema_for!(crate::cmd::generate::GenerateJsonOutput),
    );

    // validate --json
    schemas.insert(
        "validate",
        schema_for!(crate::cmd::validate::ValidateJsonOutput),
    );

    schemas
}

/// A single schema by name.
pub fn get_schema(name: &str) -> Option<Schema> {
    all_schemas().remove(name)
}

/// Names of all available schemas.
pub fn schema_names() -> Vec<&'static str> {
    all_schemas().keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_names() {
        assert_eq!(schema_names(), vec!["config", "generate", "validate"]);
    }

    #[test]
    fn test_config_schema_lists_tables() {
        let schema = get_schema("config").unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert!(value["properties"]["tables"].is_object());
    }

    #[test]
    fn test_unknown_schema() {
        assert!(get_schema("split").is_none());
    }
}
