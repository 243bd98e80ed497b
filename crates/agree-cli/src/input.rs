//! Reading analysis schemas from JSON files.

use std::path::Path;

use agree_core::Schema;
use anyhow::{Context, Result};

/// Reads a schema from a JSON file.
///
/// A schema without an id is named after the file stem.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut schema: Schema = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse schema {}", path.display()))?;

    if schema.id.is_empty() {
        schema.id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    tracing::debug!(
        path = ?path,
        schema = %schema.id,
        partitions = schema.partitions.len(),
        labels = schema.label_count(),
        "loaded schema"
    );
    Ok(schema)
}

/// Reads every file, in order.
pub fn load_schemas(paths: &[impl AsRef<Path>]) -> Result<Vec<Schema>> {
    paths.iter().map(|p| load_schema(p.as_ref())).collect()
}
