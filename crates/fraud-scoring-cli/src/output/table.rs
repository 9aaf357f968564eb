use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten_rows, format_scalar};

/// Format the scoring result as a field/value table using the tabled crate.
pub fn print_table(value: &Value) {
    let Some(envelope) = value.as_object() else {
        println!("{}", value);
        return;
    };

    let result = envelope.get("result").unwrap_or(value);
    if let Value::Object(res_map) = result {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in flatten_rows(res_map) {
            if key == "verdict.rule_hits" {
                continue;
            }
            builder.push_record([key.as_str(), &format_value(&val)]);
        }
        println!("{}", Table::from(builder));
    }

    if let Some(Value::Array(hits)) = result.get("verdict").and_then(|v| v.get("rule_hits")) {
        if !hits.is_empty() {
            print_rule_hits(hits);
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_rule_hits(hits: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(["Rule", "Points", "Reason"]);
    for hit in hits {
        builder.push_record([
            hit.get("rule").map(format_scalar).unwrap_or_default(),
            hit.get("points").map(format_scalar).unwrap_or_default(),
            hit.get("reason").map(format_scalar).unwrap_or_default(),
        ]);
    }
    println!("\n{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Array(arr) if arr.is_empty() => "(none)".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join("\n"),
        _ => format_scalar(value),
    }
}
