use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

use kommwert_core::profile::OutputProfile;

/// Read a generation profile from a semicolon-delimited CSV file with a
/// header row. Values come from `column` when given, else the last column.
pub fn read_profile_csv(
    path: &str,
    column: Option<&str>,
) -> Result<OutputProfile, Box<dyn std::error::Error>> {
    let file =
        std::fs::File::open(path).map_err(|e| format!("Failed to read profile '{path}': {e}"))?;
    parse_profile(file, column).map_err(|e| format!("Profile '{path}': {e}").into())
}

fn parse_profile<R: Read>(
    reader: R,
    column: Option<&str>,
) -> Result<OutputProfile, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let index = match column {
        Some(name) => headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| format!("no column named '{name}'"))?,
        None => headers.len().checked_sub(1).ok_or("empty header row")?,
    };

    let mut values = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let raw = record
            .get(index)
            .ok_or_else(|| format!("row {} has no column {index}", row + 2))?
            .trim();
        values.push(parse_decimal(raw).ok_or_else(|| format!("row {}: invalid number '{raw}'", row + 2))?);
    }

    log::debug!("read profile with {} periods", values.len());
    Ok(OutputProfile::new(values))
}

/// Accepts both `0.25` and the German `0,25`.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .or_else(|_| Decimal::from_str(&raw.replace(',', ".")))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_last_column_by_default() {
        let data = "timeindex;wind-onshore\n2019-01-01 00:00;0.25\n2019-01-01 01:00;0,5\n";
        let profile = parse_profile(data.as_bytes(), None).unwrap();
        assert_eq!(profile.values, vec![dec!(0.25), dec!(0.5)]);
    }

    #[test]
    fn test_named_column() {
        let data = "a;b;c\n1;2;3\n4;5;6\n";
        let profile = parse_profile(data.as_bytes(), Some("b")).unwrap();
        assert_eq!(profile.values, vec![dec!(2), dec!(5)]);
    }

    #[test]
    fn test_unknown_column_and_bad_value() {
        let data = "a;b\n1;x\n";
        assert!(parse_profile(data.as_bytes(), Some("z")).is_err());
        assert!(parse_profile(data.as_bytes(), None).is_err());
    }

    #[test]
    fn test_scientific_notation() {
        let data = "v\n1.5e-3\n";
        let profile = parse_profile(data.as_bytes(), None).unwrap();
        assert_eq!(profile.values, vec![dec!(0.0015)]);
    }
}
