use serde_json::Value;
use std::io;

use super::{flatten, render_scalar, row_cells, row_headers};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout. A single result becomes `field,value`
/// pairs with dotted field names; a list becomes one row per item.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = match value {
        Value::Object(map) => map.get("result").unwrap_or(value),
        _ => value,
    };
    match body {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten(map).fields {
                let _ = wtr.write_record([key, render(&val)]);
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([render(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut StdoutWriter<'_>, rows: &[Value]) {
    if rows.is_empty() {
        return;
    }
    if !rows.iter().any(Value::is_object) {
        for row in rows {
            let _ = wtr.write_record([render(row)]);
        }
        return;
    }

    let headers = row_headers(rows);
    let _ = wtr.write_record(&headers);
    for row in rows {
        let _ = wtr.write_record(row_cells(row, &headers, render));
    }
}

fn render(value: &Value) -> String {
    render_scalar(value, "")
}
