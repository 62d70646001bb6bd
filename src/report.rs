//! Read-only reporting passes over the aggregated variable map. Each pass
//! writes line-oriented text to the supplied writer and touches nothing else,
//! so any combination of passes can run in sequence.

use anyhow::Result;
use std::io::Write;

use crate::aggregate::VariableMap;
use crate::tables::TableIndex;

/// `{a, b, c}` in set iteration order.
fn fmt_set<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let inner = items
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", inner)
}

/// `(time lat lon)` for one dimension tuple.
fn fmt_tuple(tokens: &[String]) -> String {
    format!("({})", tokens.join(" "))
}

/// Print every variable whose tables disagree on `units`.
pub fn check_units(variables: &VariableMap, out: &mut dyn Write) -> Result<()> {
    for (var, record) in variables {
        if record.units.len() > 1 {
            writeln!(
                out,
                "Inconsistent units for {}: {}",
                var,
                fmt_set(record.units.iter())
            )?;
        }
    }
    Ok(())
}

/// Print every variable whose tables disagree on the dimensions tuple.
/// Tuples are order-sensitive; a reordering of the same tokens counts as a
/// conflict.
pub fn check_dimensions(variables: &VariableMap, out: &mut dyn Write) -> Result<()> {
    for (var, record) in variables {
        if record.dimensions.len() > 1 {
            let tuples: Vec<String> = record.dimensions.iter().map(|t| fmt_tuple(t)).collect();
            writeln!(
                out,
                "Inconsistent dimensions for {}: {}",
                var,
                fmt_set(&tuples)
            )?;
        }
    }
    Ok(())
}

/// Print every variable that appears in more than one table, with the count
/// and the set of originating table ids.
pub fn check_multitable(variables: &VariableMap, out: &mut dyn Write) -> Result<()> {
    for (var, record) in variables {
        if record.origin.len() > 1 {
            writeln!(
                out,
                "{} {} {}",
                var,
                record.origin.len(),
                fmt_set(record.origin.iter())
            )?;
        }
    }
    Ok(())
}

/// Print the entry count per table and the total number of distinct variable
/// names across the whole collection.
pub fn report_statistics(
    tables: &TableIndex,
    variables: &VariableMap,
    out: &mut dyn Write,
) -> Result<()> {
    writeln!(out, "Variables per table:")?;
    for (table_id, table) in tables {
        writeln!(out, "{}: {}", table_id, table.variable_entry.len())?;
    }
    writeln!(out, "Total variables: {}", variables.len())?;
    Ok(())
}
