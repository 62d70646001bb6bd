//! Loader: read every `*.json` table file in a directory, validate each one
//! against the table schema, and index the results by `table_id`.

use anyhow::{bail, Context, Result};
use glob::glob;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::schema;

/// The required header block of one table file.
#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub table_id: String,
    pub product: String,
    pub table_date: String,
    pub missing_value: String,
    #[serde(default)]
    pub int_missing_value: Option<String>,
    pub generic_levels: String,
    pub mip_era: String,
    #[serde(rename = "Conventions")]
    pub conventions: String,
}

/// One loaded table: its header plus the raw variable entries. Entries stay
/// untyped here; each one is validated individually during aggregation.
#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    #[serde(rename = "Header")]
    pub header: Header,
    pub variable_entry: BTreeMap<String, Value>,
}

/// In-memory index of loaded tables keyed by `table_id`. Ordered, so every
/// downstream pass iterates tables in the same order on every run.
pub type TableIndex = BTreeMap<String, Table>;

/// Load every `*.json` file under `dir` into a [`TableIndex`].
///
/// Any unreadable file, malformed JSON, or schema violation aborts the whole
/// load; no partial index is returned. Two files declaring the same
/// `table_id` resolve last-write-wins, matching the upstream checker.
pub fn load_tables(dir: &Path) -> Result<TableIndex> {
    let pattern = format!("{}/*.json", dir.display());
    let mut index = TableIndex::new();

    for entry in
        glob(&pattern).with_context(|| format!("invalid glob pattern '{}'", pattern))?
    {
        let path = entry.context("reading glob entry")?;
        let table =
            load_table(&path).with_context(|| format!("loading table {:?}", path))?;
        debug!(
            table_id = %table.header.table_id,
            path = %path.display(),
            entries = table.variable_entry.len(),
            "table validated"
        );
        index.insert(table.header.table_id.clone(), table);
    }

    Ok(index)
}

/// Parse and validate a single table file.
fn load_table(path: &Path) -> Result<Table> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let doc: Value =
        serde_json::from_str(&text).with_context(|| format!("parsing {:?}", path))?;

    let violations = schema::check_table(&doc);
    if !violations.is_empty() {
        bail!("schema violations: {}", schema::describe(&violations));
    }

    serde_json::from_value(doc).context("deserializing validated table")
}
