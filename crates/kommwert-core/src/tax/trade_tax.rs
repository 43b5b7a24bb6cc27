use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Share of the base assessment that flows to federal and state level
/// (Gewerbesteuerumlage) and is therefore not kept by the municipality.
pub const FEDERAL_STATE_OFFSET: Rate = dec!(0.35);

/// Trade tax assessed on one profit figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeTax {
    /// Tax levied by the municipality
    pub total: Money,
    /// Part of `total` the municipality keeps after the federal/state offset
    pub municipal_share: Money,
}

/// Trade tax on `profit`:
///
/// `total = (profit − allowance) × base_rate × multiplier`
/// `municipal_share = total − (profit − allowance) × base_rate × 0.35`
///
/// Results are not clamped; a profit below the allowance yields negative
/// values. Callers decide whether a year is taxable at all.
pub fn trade_tax(
    profit: Money,
    tax_free_allowance: Money,
    base_rate: Rate,
    municipal_multiplier: Decimal,
) -> TradeTax {
    let assessment = (profit - tax_free_allowance) * base_rate;
    let total = assessment * municipal_multiplier;
    TradeTax {
        total,
        municipal_share: total - assessment * FEDERAL_STATE_OFFSET,
    }
}

/// Parameters for taxing an operator's annual profit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatorTradeTaxParams {
    /// Fraction of the taxable profit that enters the assessment
    pub profit_factor: Rate,
    pub tax_free_allowance: Money,
    pub base_rate: Rate,
    pub municipal_multiplier: Decimal,
}

/// Trade tax of a plant operator for one year. Years without a strictly
/// positive taxable profit pay nothing.
pub fn operator_trade_tax(taxable_profit: Money, params: &OperatorTradeTaxParams) -> TradeTax {
    if taxable_profit <= Decimal::ZERO {
        return TradeTax::default();
    }
    trade_tax(
        taxable_profit * params.profit_factor,
        params.tax_free_allowance,
        params.base_rate,
        params.municipal_multiplier,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trade_tax_reference_commercial_income() {
        // (220000 − 24500) × 0.035 × 3.34 = 22853.95
        let t = trade_tax(dec!(220000), dec!(24500), dec!(0.035), dec!(3.34));
        assert_eq!(t.total, dec!(22853.95));
        // offset = 195500 × 0.035 × 0.35 = 2394.875
        assert_eq!(t.municipal_share, dec!(20459.075));
    }

    #[test]
    fn test_trade_tax_not_clamped() {
        let t = trade_tax(dec!(10000), dec!(24500), dec!(0.035), dec!(4));
        assert!(t.total < Decimal::ZERO);
        assert!(t.municipal_share < Decimal::ZERO);
    }

    #[test]
    fn test_operator_trade_tax_applies_profit_factor() {
        let params = OperatorTradeTaxParams {
            profit_factor: dec!(0.9),
            tax_free_allowance: Decimal::ZERO,
            base_rate: dec!(0.035),
            municipal_multiplier: dec!(4),
        };
        // 100000 × 0.9 = 90000; × 0.035 = 3150; total = 12600; share = 12600 − 1102.5
        let t = operator_trade_tax(dec!(100000), &params);
        assert_eq!(t.total, dec!(12600));
        assert_eq!(t.municipal_share, dec!(11497.5));
    }

    #[test]
    fn test_operator_trade_tax_zero_for_non_positive_profit() {
        let params = OperatorTradeTaxParams {
            profit_factor: dec!(0.9),
            tax_free_allowance: dec!(24500),
            base_rate: dec!(0.035),
            municipal_multiplier: dec!(3.34),
        };
        assert_eq!(operator_trade_tax(Decimal::ZERO, &params), TradeTax::default());
        assert_eq!(operator_trade_tax(dec!(-5), &params), TradeTax::default());
    }
}
