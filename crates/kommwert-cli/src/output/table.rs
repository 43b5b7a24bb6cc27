use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Overview columns of an estimate, in chart order.
const OVERVIEW_COLUMNS: [&str; 7] = [
    "plant_trade_tax",
    "state_bonus",
    "participation_levy",
    "direct_lease",
    "lease_trade_tax",
    "lease_income_tax",
    "total",
];

/// Columns of a simulation's year table.
const YEAR_COLUMNS: [&str; 9] = [
    "year",
    "revenue",
    "interest",
    "amortization",
    "outstanding_principal",
    "profit",
    "loss_carryforward",
    "taxable_profit",
    "trade_tax_municipal",
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let Value::Object(envelope) = value else {
        println!("{}", value);
        return;
    };

    match envelope.get("result") {
        Some(Value::Object(result)) if result.contains_key("groups") => print_estimate(result),
        Some(Value::Object(result)) if result.contains_key("years") => print_simulation(result),
        Some(Value::Object(result)) => print_fields(result),
        _ => print_fields(envelope),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_estimate(result: &Map<String, Value>) {
    let Some(Value::Object(groups)) = result.get("groups") else {
        return;
    };

    let mut builder = Builder::default();
    let mut header = vec!["group".to_string()];
    header.extend(OVERVIEW_COLUMNS.iter().map(|c| c.to_string()));
    builder.push_record(header);

    for (name, group) in groups {
        let mut row = vec![name.clone()];
        for column in OVERVIEW_COLUMNS {
            let cell = group
                .get("overview")
                .and_then(|o| o.get(column))
                .map(format_value)
                .unwrap_or_default();
            row.push(cell);
        }
        builder.push_record(row);
    }

    println!("{}", Table::from(builder));
}

fn print_simulation(result: &Map<String, Value>) {
    if let Some(Value::Array(years)) = result.get("years") {
        let mut builder = Builder::default();
        builder.push_record(YEAR_COLUMNS);
        for year in years {
            let row: Vec<String> = YEAR_COLUMNS
                .iter()
                .map(|c| year.get(*c).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
        println!("{}", Table::from(builder));
    }

    let summary: Map<String, Value> = result
        .iter()
        .filter(|(k, _)| k.as_str() != "years")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    print_fields(&summary);
}

fn print_fields(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
