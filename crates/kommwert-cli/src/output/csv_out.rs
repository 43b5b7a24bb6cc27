use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// A result with a `years` series (simulation) is written one row per year;
/// an estimate one row per reporting group; anything else as field/value
/// pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(years)) = result.get("years") {
        write_rows(&mut wtr, years);
    } else if let Some(Value::Object(groups)) = result.get("groups") {
        let rows: Vec<Value> = groups
            .iter()
            .filter_map(|(name, g)| {
                let mut row = g.get("overview")?.as_object()?.clone();
                row.insert("group".to_string(), Value::String(name.clone()));
                Some(Value::Object(row))
            })
            .collect();
        write_rows(&mut wtr, &rows);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_csv_value(result)]);
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
