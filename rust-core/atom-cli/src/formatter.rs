// SPDX-License-Identifier: PMPL-1.0-or-later
//!
//! Output formatters for AtoM responses.
//!
//! - **Json**: pretty-printed server response, plus the injected `slug`.
//! - **Table**: a Field/Value table for single records, and one row per hit
//!   for search responses (`{"total": n, "results": [...]}`).

use comfy_table::{Cell, ContentArrangement, Table};
use serde_json::{Map, Value};
use std::fmt;

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!("Unknown format '{other}'. Valid formats: json, table")),
        }
    }
}

/// Render a response in the selected format.
pub fn format_value(value: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        OutputFormat::Table => format_table(value),
    }
}

fn format_table(value: &Value) -> String {
    match value {
        Value::Object(obj) => match obj.get("results") {
            Some(Value::Array(hits)) => format_hits(hits, obj.get("total")),
            _ => format_record(obj),
        },
        Value::Array(hits) => format_hits(hits, None),
        other => other.to_string(),
    }
}

/// One row per search hit, columns in first-seen key order.
fn format_hits(hits: &[Value], total: Option<&Value>) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for hit in hits {
        if let Value::Object(obj) = hit {
            for key in obj.keys() {
                if !columns.contains(&key.as_str()) {
                    columns.push(key);
                }
            }
        }
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(columns.iter().map(|c| Cell::new(c)));
    for hit in hits {
        table.add_row(
            columns
                .iter()
                .map(|col| Cell::new(cell_text(hit.get(*col).unwrap_or(&Value::Null)))),
        );
    }

    let shown = hits.len();
    match total.and_then(Value::as_u64) {
        Some(total) => format!("{table}\n({shown} of {total} results)"),
        None => format!("{table}\n({shown} result{})", if shown == 1 { "" } else { "s" }),
    }
}

/// A single record as a two-column table (Field | Value).
fn format_record(obj: &Map<String, Value>) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new("Field"), Cell::new("Value")]);
    for (key, val) in obj {
        table.add_row(vec![Cell::new(key), Cell::new(cell_text(val))]);
    }
    table.to_string()
}

/// Short text for a table cell. Large nested values are summarised.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(arr) if arr.len() > 3 => format!("[{} items]", arr.len()),
        Value::Object(obj) if obj.len() > 3 => format!("{{{} fields}}", obj.len()),
        other => other.to_string(),
    }
}
