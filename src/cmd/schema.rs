use crate::json_schema::{all_schemas, get_schema, schema_names};
use anyhow::Context;
use std::fs;
use std::path::PathBuf;

pub fn run(command: Option<String>, output_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let schemas = match &command {
        Some(name) => {
            let schema = get_schema(name).with_context(|| {
                format!(
                    "unknown schema '{}' (available: {})",
                    name,
                    schema_names().join(", ")
                )
            })?;
            vec![(name.clone(), schema)]
        }
        None => all_schemas()
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect(),
    };

    if let Some(dir) = output_dir {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        for (name, schema) in &schemas {
            let path = dir.join(format!("{}.schema.json", name));
            let mut content = serde_json::to_string_pretty(schema)?;
            content.push('\n');
            fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        return Ok(());
    }

    if command.is_some() {
        println!("{}", serde_json::to_string_pretty(&schemas[0].1)?);
    } else {
        let map: serde_json::Map<String, serde_json::Value> = schemas
            .into_iter()
            .map(|(name, schema)| Ok((name, serde_json::to_value(schema)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        println!("{}", serde_json::to_string_pretty(&map)?);
    }

    Ok(())
}
