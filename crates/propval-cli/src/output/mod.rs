pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// A report object split into dotted scalar fields and the row lists
/// (projections, scenario rows, listings) found inside it.
#[derive(Debug, Default)]
pub struct Flattened {
    pub fields: Vec<(String, Value)>,
    pub row_sets: Vec<(String, Vec<Value>)>,
}

/// Flatten nested objects into `parent.child` keys. Arrays of objects are
/// kept aside as row sets; arrays of scalars stay a single field.
pub fn flatten(map: &Map<String, Value>) -> Flattened {
    let mut out = Flattened::default();
    flatten_into(&mut out, "", map);
    out
}

fn flatten_into(out: &mut Flattened, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(out, &path, inner),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                out.row_sets.push((path, items.clone()));
            }
            _ => out.fields.push((path, val.clone())),
        }
    }
}

/// Column order for a list of row objects: keys in order of first
/// appearance, nested objects flattened.
pub fn row_headers(rows: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for (key, _) in flatten(map).fields {
                if !headers.contains(&key) {
                    headers.push(key);
                }
            }
        }
    }
    headers
}

/// One row's cells in `headers` order.
pub fn row_cells(row: &Value, headers: &[String], render: fn(&Value) -> String) -> Vec<String> {
    let fields = match row {
        Value::Object(map) => flatten(map).fields,
        other => vec![(String::new(), other.clone())],
    };
    headers
        .iter()
        .map(|h| {
            fields
                .iter()
                .find(|(k, _)| k == h)
                .map(|(_, v)| render(v))
                .unwrap_or_default()
        })
        .collect()
}

/// Scalar rendering shared by the text formatters; `null` becomes `empty`.
pub fn render_scalar(value: &Value, empty: &str) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => empty.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|v| render_scalar(v, empty))
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
