use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::KommWertError;
use crate::KommWertResult;

/// Legal owner of a parcel, which decides how its lease reaches the municipality.
///
/// Deserialises from the snake_case names below and from the German labels
/// of the input form. Any other label is kept verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OwnerType {
    /// Owned by a business; the lease is additional trade-taxable profit
    CommercialProperty,
    /// Owned by a resident; the lease is additional taxable income
    PrivateProperty,
    /// Owned by the municipality; the lease is paid to it directly
    MunicipalProperty,
    /// State, federal or unknown ownership; no municipal revenue
    Other(String),
}

/// Label used for the implicit entry of a technology without ownership data.
pub const UNASSIGNED_OWNER: &str = "Landes-/Bundeseigentum";

impl From<String> for OwnerType {
    fn from(label: String) -> Self {
        match label.trim() {
            "commercial_property" | "Gewerbliches Eigentum" => OwnerType::CommercialProperty,
            "private_property" | "Privateigentum" => OwnerType::PrivateProperty,
            "municipal_property" | "Gemeindeeigentum" => OwnerType::MunicipalProperty,
            _ => OwnerType::Other(label),
        }
    }
}

impl From<OwnerType> for String {
    fn from(owner: OwnerType) -> Self {
        owner.to_string()
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnerType::CommercialProperty => f.write_str("commercial_property"),
            OwnerType::PrivateProperty => f.write_str("private_property"),
            OwnerType::MunicipalProperty => f.write_str("municipal_property"),
            OwnerType::Other(label) => f.write_str(label),
        }
    }
}

/// Percentage of a technology's area held by one owner type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipShare {
    #[serde(alias = "ownertype")]
    pub owner_type: OwnerType,
    /// 0..=100
    #[serde(alias = "flaechenanteil")]
    pub share_percent: Decimal,
}

impl OwnershipShare {
    pub fn new(owner_type: OwnerType, share_percent: Decimal) -> Self {
        OwnershipShare {
            owner_type,
            share_percent,
        }
    }

    pub fn fraction(&self) -> Decimal {
        self.share_percent / dec!(100)
    }
}

/// Check one technology's ownership list and return it ready for allocation.
///
/// An empty list becomes a single unassigned entry at 0%. Shares must lie in
/// `0..=100` and may not add up to more than 100; a total below 100 leaves the
/// rest of the area without municipal revenue and is reported as a warning.
pub fn checked_shares(
    field: &str,
    shares: &[OwnershipShare],
    warnings: &mut Vec<String>,
) -> KommWertResult<Vec<OwnershipShare>> {
    if shares.is_empty() {
        return Ok(vec![OwnershipShare::new(
            OwnerType::Other(UNASSIGNED_OWNER.into()),
            Decimal::ZERO,
        )]);
    }

    for (i, s) in shares.iter().enumerate() {
        if s.share_percent < Decimal::ZERO || s.share_percent > dec!(100) {
            return Err(KommWertError::Consistency {
                field: format!("{field}[{i}].share_percent"),
                reason: format!("Share must be between 0 and 100, got {}", s.share_percent),
            });
        }
    }

    let total: Decimal = shares.iter().map(|s| s.share_percent).sum();
    if total > dec!(100) {
        return Err(KommWertError::Consistency {
            field: field.into(),
            reason: format!("Ownership shares add up to {total}%, more than 100%"),
        });
    }
    if total > Decimal::ZERO && total < dec!(100) {
        warnings.push(format!(
            "{field}: ownership shares cover {total}% of the area; the rest yields no municipal revenue"
        ));
    }

    Ok(shares.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_type_from_german_labels() {
        let parsed: Vec<OwnerType> = serde_json::from_str(
            r#"["Gewerbliches Eigentum", "Privateigentum", "Gemeindeeigentum", "N/A"]"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            vec![
                OwnerType::CommercialProperty,
                OwnerType::PrivateProperty,
                OwnerType::MunicipalProperty,
                OwnerType::Other("N/A".into()),
            ]
        );
    }

    #[test]
    fn test_owner_type_round_trips_snake_case() {
        let json = serde_json::to_string(&OwnerType::MunicipalProperty).unwrap();
        assert_eq!(json, r#""municipal_property""#);
        let back: OwnerType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OwnerType::MunicipalProperty);
    }

    #[test]
    fn test_share_aliases() {
        let s: OwnershipShare =
            serde_json::from_str(r#"{ "ownertype": "Privateigentum", "flaechenanteil": "40" }"#)
                .unwrap();
        assert_eq!(s.owner_type, OwnerType::PrivateProperty);
        assert_eq!(s.fraction(), dec!(0.4));
    }

    #[test]
    fn test_empty_list_becomes_unassigned_entry() {
        let mut warnings = Vec::new();
        let shares = checked_shares("wind.ownership", &[], &mut warnings).unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].share_percent, Decimal::ZERO);
        assert!(matches!(shares[0].owner_type, OwnerType::Other(_)));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_shares_over_100_rejected() {
        let mut warnings = Vec::new();
        let shares = vec![
            OwnershipShare::new(OwnerType::PrivateProperty, dec!(60)),
            OwnershipShare::new(OwnerType::MunicipalProperty, dec!(50)),
        ];
        let err = checked_shares("ground_pv.ownership", &shares, &mut warnings).unwrap_err();
        assert!(matches!(err, KommWertError::Consistency { .. }));
    }

    #[test]
    fn test_negative_share_rejected() {
        let mut warnings = Vec::new();
        let shares = vec![OwnershipShare::new(OwnerType::PrivateProperty, dec!(-5))];
        let err = checked_shares("wind.ownership", &shares, &mut warnings).unwrap_err();
        match err {
            KommWertError::Consistency { field, .. } => {
                assert_eq!(field, "wind.ownership[0].share_percent")
            }
            other => panic!("Expected Consistency, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_coverage_warns() {
        let mut warnings = Vec::new();
        let shares = vec![OwnershipShare::new(OwnerType::PrivateProperty, dec!(70))];
        checked_shares("wind.ownership", &shares, &mut warnings).unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("70"));
    }
}
