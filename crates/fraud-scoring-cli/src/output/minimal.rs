use serde_json::Value;

/// Print the verdict as one line: score, flag, and joined reasons.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let verdict = result_obj.get("verdict").unwrap_or(result_obj);

    match (verdict.get("risk_score"), verdict.get("is_suspicious")) {
        (Some(score), Some(suspicious)) => {
            let label = if suspicious.as_bool().unwrap_or(false) {
                "SUSPICIOUS"
            } else {
                "OK"
            };
            match verdict.get("fraud_reason").and_then(Value::as_str) {
                Some(reason) => println!("{} {} {}", score, label, reason),
                None => println!("{} {}", score, label),
            }
        }
        _ => println!("{}", result_obj),
    }
}
