//! Loading the source tables named in the config

use std::fs;
use std::path::Path;

use anyhow::Context;
use legis_types::SourceTables;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::SourcePaths;

/// Read a JSON array of rows
///
/// # Errors
///
/// Returns an error naming the file if it cannot be read or is not a JSON
/// array of rows
pub fn read_table<T: DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read source table: {}", path.display()))?;
    let rows: Vec<T> = serde_json::from_str(&content)
        .with_context(|| format!("Malformed source table: {}", path.display()))?;
    debug!(path = %path.display(), rows = rows.len(), "read source table");
    Ok(rows)
}

fn read_optional<T: DeserializeOwned>(path: Option<&Path>) -> anyhow::Result<Vec<T>> {
    match path {
        Some(path) => read_table(path),
        None => Ok(Vec::new()),
    }
}

/// Load all four tables; missing keyword tables load as empty
///
/// # Errors
///
/// Returns the first [`read_table`] failure. Per-row validation happens
/// later, during the join, and never fails the load.
pub fn load_tables(paths: &SourcePaths) -> anyhow::Result<SourceTables> {
    let tables = SourceTables {
        paragraphs: read_table(&paths.paragraphs)?,
        legislation: read_table(&paths.legislation)?,
        iucn_keywords: read_optional(paths.iucn_keywords.as_deref())?,
        governance_keywords: read_optional(paths.governance_keywords.as_deref())?,
    };
    info!(
        paragraphs = tables.paragraphs.len(),
        legislation = tables.legislation.len(),
        iucn_keywords = tables.iucn_keywords.len(),
        governance_keywords = tables.governance_keywords.len(),
        "loaded source tables"
    );
    Ok(tables)
}
