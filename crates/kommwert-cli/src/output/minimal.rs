use serde_json::Value;

/// Print just the key answer of a result.
///
/// Looks for well-known result fields in order of priority, then falls back
/// to the first field in the result object. An estimate prints the horizon
/// total of every reporting group.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Object(groups)) = result_obj.get("groups") {
        for (name, group) in groups {
            let total = group.pointer("/overview/total").unwrap_or(&Value::Null);
            println!("{}: {}", name, format_minimal(total));
        }
        return;
    }

    let priority_keys = [
        "income_tax",
        "municipal_share",
        "total_municipal_trade_tax",
        "break_even_year",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
