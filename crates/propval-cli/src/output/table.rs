use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten, render_scalar, row_cells, row_headers};

/// Render output as tables: the scalar fields of the result first, then one
/// table per row list (projections, scenarios, listings), then warnings.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_object(result);
                print_envelope_notes(map);
            }
            Some(Value::Array(rows)) => {
                print_rows(rows);
                print_envelope_notes(map);
            }
            _ => print_object(map),
        },
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", render(value)),
    }
}

fn print_object(map: &Map<String, Value>) {
    let flat = flatten(map);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in &flat.fields {
        builder.push_record([key.clone(), render(val)]);
    }
    println!("{}", Table::from(builder));

    for (name, rows) in &flat.row_sets {
        println!("\n{name}:");
        print_rows(rows);
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }
    if !rows.iter().any(Value::is_object) {
        for row in rows {
            println!("{}", render(row));
        }
        return;
    }

    let headers = row_headers(rows);
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        builder.push_record(row_cells(row, &headers, render));
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {methodology}");
    }
}

fn render(value: &Value) -> String {
    render_scalar(value, "-")
}
