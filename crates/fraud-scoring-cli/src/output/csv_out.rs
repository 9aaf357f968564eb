use serde_json::Value;
use std::io;

use super::{flatten_rows, format_scalar};

/// Write the scoring result as two-column CSV (field, value) to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten_rows(map) {
                let _ = wtr.write_record([key.as_str(), &format_csv_value(&val)]);
            }
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn format_csv_value(value: &Value) -> String {
    match value {
        // reasons are joined the same way fraud_reason is
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .map(format_scalar)
            .collect::<Vec<_>>()
            .join("; "),
        _ => format_scalar(value),
    }
}
