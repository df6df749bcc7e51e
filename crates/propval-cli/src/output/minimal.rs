use serde_json::Value;

use super::{flatten, render_scalar};

/// Headline fields, most specific first. Among equal keys the shallowest
/// match wins, so a report prints its valuation before any nested scenario.
const PRIORITY_KEYS: [&str; 7] = [
    "point_estimate",
    "weighted_monthly_cash_flow",
    "monthly_cash_flow",
    "monthly_rent",
    "investment_potential",
    "county",
    "error",
];

/// Print just the headline value of the output.
pub fn print_minimal(value: &Value) {
    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(items) => items.iter().for_each(print_one),
        other => print_one(other),
    }
}

fn print_one(value: &Value) {
    match headline(value) {
        Some(line) => println!("{line}"),
        None => println!("{}", render_scalar(value, "null")),
    }
}

fn headline(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    let body = map
        .get("result")
        .and_then(Value::as_object)
        .unwrap_or(map);
    let fields = flatten(body).fields;

    for key in PRIORITY_KEYS {
        let best = fields
            .iter()
            .filter(|(path, v)| path.rsplit('.').next() == Some(key) && !v.is_null())
            .min_by_key(|(path, _)| path.matches('.').count());
        if let Some((_, v)) = best {
            return Some(render_scalar(v, "null"));
        }
    }

    fields
        .first()
        .map(|(path, v)| format!("{path}: {}", render_scalar(v, "null")))
}
