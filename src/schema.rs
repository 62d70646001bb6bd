//! Structural schemas for table files and variable entries: required keys plus
//! per-key primitive type, checked against raw JSON before any typed
//! deserialization. Checking yields a list of violations (empty = valid);
//! callers turn a non-empty list into a fatal error.

use serde_json::Value;
use std::fmt;

/// One failed check against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The document itself is not a JSON object.
    NotAnObject,
    /// A required key is absent.
    Missing(&'static str),
    /// A key is present but holds the wrong JSON type.
    WrongType {
        key: &'static str,
        expected: &'static str,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NotAnObject => write!(f, "document is not a JSON object"),
            Violation::Missing(key) => write!(f, "missing required key `{}`", key),
            Violation::WrongType { key, expected } => {
                write!(f, "key `{}` is not of type {}", key, expected)
            }
        }
    }
}

/// Render a violation list as a single message for error context.
pub fn describe(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A flat object schema: every `required` key must be present and hold a
/// string; every `optional` key is type-checked only when present.
pub struct Schema {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl Schema {
    /// Check `value` against this schema. An empty vec means valid.
    pub fn check(&self, value: &Value) -> Vec<Violation> {
        let Some(map) = value.as_object() else {
            return vec![Violation::NotAnObject];
        };
        let mut violations = Vec::new();
        for &key in self.required {
            match map.get(key) {
                None => violations.push(Violation::Missing(key)),
                Some(v) if !v.is_string() => violations.push(Violation::WrongType {
                    key,
                    expected: "string",
                }),
                Some(_) => {}
            }
        }
        for &key in self.optional {
            if let Some(v) = map.get(key) {
                if !v.is_string() {
                    violations.push(Violation::WrongType {
                        key,
                        expected: "string",
                    });
                }
            }
        }
        violations
    }
}

/// Required string keys of a table's `Header` block.
/// `int_missing_value` is optional upstream, so only its type is enforced.
pub const HEADER_SCHEMA: Schema = Schema {
    required: &[
        "table_id",
        "product",
        "table_date",
        "missing_value",
        "generic_levels",
        "mip_era",
        "Conventions",
    ],
    optional: &["int_missing_value"],
};

/// Required string keys of a single variable entry.
pub const VARIABLE_SCHEMA: Schema = Schema {
    required: &[
        "frequency",
        "modeling_realm",
        "standard_name",
        "units",
        "cell_methods",
        "cell_measures",
        "long_name",
        "dimensions",
        "out_name",
        "type",
        "positive",
        "valid_min",
        "valid_max",
        "ok_min_mean_abs",
        "ok_max_mean_abs",
    ],
    optional: &[],
};

/// Check one table document: `Header` and `variable_entry` must both be
/// objects, and `Header` must satisfy [`HEADER_SCHEMA`]. The shape of the
/// individual entries under `variable_entry` is deliberately not checked
/// here; the aggregator validates each one against [`VARIABLE_SCHEMA`].
pub fn check_table(doc: &Value) -> Vec<Violation> {
    let Some(map) = doc.as_object() else {
        return vec![Violation::NotAnObject];
    };
    let mut violations = Vec::new();
    match map.get("Header") {
        None => violations.push(Violation::Missing("Header")),
        Some(header) if !header.is_object() => violations.push(Violation::WrongType {
            key: "Header",
            expected: "object",
        }),
        Some(header) => violations.extend(HEADER_SCHEMA.check(header)),
    }
    match map.get("variable_entry") {
        None => violations.push(Violation::Missing("variable_entry")),
        Some(v) if !v.is_object() => violations.push(Violation::WrongType {
            key: "variable_entry",
            expected: "object",
        }),
        Some(_) => {}
    }
    violations
}
