//! Fold every variable entry of every loaded table into a per-variable
//! record: the units seen, the dimension tuples seen, and the tables the
//! variable came from. Each entry is validated against the variable schema
//! before it contributes anything.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::schema::{self, VARIABLE_SCHEMA};
use crate::tables::TableIndex;

/// Full metadata for one variable within one table. All fields are required
/// strings; `type` is renamed because it is a Rust keyword.
#[derive(Debug, Clone, Deserialize)]
pub struct VariableEntry {
    pub frequency: String,
    pub modeling_realm: String,
    pub standard_name: String,
    pub units: String,
    pub cell_methods: String,
    pub cell_measures: String,
    pub long_name: String,
    pub dimensions: String,
    pub out_name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub positive: String,
    pub valid_min: String,
    pub valid_max: String,
    pub ok_min_mean_abs: String,
    pub ok_max_mean_abs: String,
}

/// Everything observed for one variable name across the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRecord {
    /// Distinct `units` strings seen.
    pub units: BTreeSet<String>,
    /// Distinct dimension tuples seen. Token order is preserved, so
    /// `"time lat lon"` and `"time lon lat"` are two different tuples.
    pub dimensions: BTreeSet<Vec<String>>,
    /// Ids of the tables the variable appears in.
    pub origin: BTreeSet<String>,
}

/// Aggregated view over the collection, keyed by variable name.
pub type VariableMap = BTreeMap<String, VariableRecord>;

/// Build the per-variable map from a loaded table index.
///
/// Halts on the first entry that fails the variable schema; a run that fails
/// here produces no reports at all.
pub fn aggregate_variables(tables: &TableIndex) -> Result<VariableMap> {
    let mut variables = VariableMap::new();

    for (table_id, table) in tables {
        for (var_name, raw) in &table.variable_entry {
            let violations = VARIABLE_SCHEMA.check(raw);
            if !violations.is_empty() {
                bail!(
                    "variable '{}' in table '{}': {}",
                    var_name,
                    table_id,
                    schema::describe(&violations)
                );
            }
            let entry: VariableEntry = serde_json::from_value(raw.clone())
                .with_context(|| {
                    format!("deserializing variable '{}' in table '{}'", var_name, table_id)
                })?;

            let record = variables.entry(var_name.clone()).or_default();
            record
                .dimensions
                .insert(entry.dimensions.split_whitespace().map(str::to_string).collect());
            record.units.insert(entry.units);
            record.origin.insert(table_id.clone());
        }
    }

    Ok(variables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{Header, Table};
    use anyhow::Result;
    use serde_json::{json, Value};

    fn entry(units: &str, dimensions: &str) -> Value {
        json!({
            "frequency": "mon",
            "modeling_realm": "atmos",
            "standard_name": "air_temperature",
            "units": units,
            "cell_methods": "area: time: mean",
            "cell_measures": "area: areacella",
            "long_name": "Near-Surface Air Temperature",
            "dimensions": dimensions,
            "out_name": "tas",
            "type": "real",
            "positive": "",
            "valid_min": "",
            "valid_max": "",
            "ok_min_mean_abs": "",
            "ok_max_mean_abs": ""
        })
    }

    fn table(table_id: &str, entries: &[(&str, Value)]) -> Table {
        Table {
            header: Header {
                table_id: table_id.to_string(),
                product: "model-output".to_string(),
                table_date: "01 July 2019".to_string(),
                missing_value: "1e20".to_string(),
                int_missing_value: None,
                generic_levels: "alevel".to_string(),
                mip_era: "CMIP6".to_string(),
                conventions: "CF-1.7 CMIP-6.2".to_string(),
            },
            variable_entry: entries
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    fn index(tables: Vec<Table>) -> TableIndex {
        tables
            .into_iter()
            .map(|t| (t.header.table_id.clone(), t))
            .collect()
    }

    #[test]
    fn test_folds_units_dimensions_and_origin() -> Result<()> {
        let tables = index(vec![
            table("Amon", &[("tas", entry("K", "time lat lon"))]),
            table("day", &[("tas", entry("degC", "time lat lon"))]),
        ]);

        let variables = aggregate_variables(&tables)?;
        let record = variables.get("tas").expect("tas aggregated");
        assert_eq!(
            record.units,
            ["K", "degC"].iter().map(|s| s.to_string()).collect()
        );
        assert_eq!(record.dimensions.len(), 1);
        assert_eq!(
            record.origin,
            ["Amon", "day"].iter().map(|s| s.to_string()).collect()
        );
        Ok(())
    }

    #[test]
    fn test_dimension_tuples_are_order_sensitive() -> Result<()> {
        let tables = index(vec![
            table("Amon", &[("tas", entry("K", "time lat lon"))]),
            table("day", &[("tas", entry("K", "time lon lat"))]),
        ]);

        let variables = aggregate_variables(&tables)?;
        let record = variables.get("tas").unwrap();
        assert_eq!(record.dimensions.len(), 2);
        assert!(record
            .dimensions
            .contains(&vec!["time".to_string(), "lat".to_string(), "lon".to_string()]));
        assert!(record
            .dimensions
            .contains(&vec!["time".to_string(), "lon".to_string(), "lat".to_string()]));
        Ok(())
    }

    #[test]
    fn test_identical_entries_collapse_to_singleton_sets() -> Result<()> {
        let tables = index(vec![
            table("Amon", &[("tas", entry("K", "time lat lon"))]),
            table("day", &[("tas", entry("K", "time lat lon"))]),
        ]);

        let variables = aggregate_variables(&tables)?;
        let record = variables.get("tas").unwrap();
        assert_eq!(record.units.len(), 1);
        assert_eq!(record.dimensions.len(), 1);
        assert_eq!(record.origin.len(), 2);
        Ok(())
    }

    #[test]
    fn test_missing_entry_field_halts_aggregation() {
        let mut bad = entry("K", "time lat lon");
        bad.as_object_mut().unwrap().remove("cell_methods");
        let tables = index(vec![table("Amon", &[("tas", bad)])]);

        let err = aggregate_variables(&tables).unwrap_err();
        let msg = format!("{:#}", err);
        assert!(msg.contains("tas"), "names the variable: {msg}");
        assert!(msg.contains("Amon"), "names the table: {msg}");
        assert!(msg.contains("cell_methods"), "names the field: {msg}");
    }

    #[test]
    fn test_mistyped_entry_field_halts_aggregation() {
        let mut bad = entry("K", "time lat lon");
        bad["valid_min"] = json!(0.0);
        let tables = index(vec![table("Amon", &[("tas", bad)])]);

        let err = aggregate_variables(&tables).unwrap_err();
        assert!(format!("{:#}", err).contains("valid_min"));
    }
}
