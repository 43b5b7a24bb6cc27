#![cfg(feature = "tax")]

use kommwert_core::tax::income_tax::{income_tax_delta, personal_income_tax};
use kommwert_core::tax::trade_tax::{operator_trade_tax, trade_tax, OperatorTradeTaxParams};
use kommwert_core::KommWertError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Personal income tax
// ===========================================================================

#[test]
fn test_income_tax_bracket_boundaries() {
    let cases = [
        (dec!(0), dec!(0)),
        (dec!(11604), dec!(0)),
        (dec!(11605), dec!(0)),
        (dec!(17005), dec!(1025)),
        (dec!(17006), dec!(1026)),
        (dec!(66760), dec!(17437)),
        (dec!(66761), dec!(17437)),
        (dec!(277825), dec!(106084)),
        (dec!(277826), dec!(106085)),
    ];
    for (income, expected) in cases {
        assert_eq!(personal_income_tax(income).unwrap(), expected, "income {income}");
    }
}

#[test]
fn test_income_tax_truncates_cents() {
    assert_eq!(
        personal_income_tax(dec!(17005.99)).unwrap(),
        personal_income_tax(dec!(17005)).unwrap()
    );
}

#[test]
fn test_income_tax_monotone_over_reference_range() {
    let mut previous = Decimal::ZERO;
    let mut income = Decimal::ZERO;
    while income <= dec!(400000) {
        let tax = personal_income_tax(income).unwrap();
        assert!(tax >= previous, "tax dropped at {income}");
        previous = tax;
        income += dec!(2500);
    }
}

#[test]
fn test_negative_income_is_domain_error() {
    match personal_income_tax(dec!(-1)) {
        Err(KommWertError::ComputationDomain { function, .. }) => {
            assert_eq!(function, "personal_income_tax")
        }
        other => panic!("expected domain error, got {other:?}"),
    }
}

#[test]
fn test_income_tax_delta_on_reference_income() {
    assert_eq!(income_tax_delta(dec!(24122), dec!(4500)).unwrap(), dec!(1231));
    assert_eq!(income_tax_delta(dec!(24122), Decimal::ZERO).unwrap(), Decimal::ZERO);
}

// ===========================================================================
// Trade tax
// ===========================================================================

#[test]
fn test_trade_tax_reference_commercial_income() {
    let t = trade_tax(dec!(220000), dec!(24500), dec!(0.035), dec!(3.34));
    assert_eq!(t.total, dec!(22853.95));
    assert_eq!(t.municipal_share, dec!(20459.075));
}

#[test]
fn test_operator_trade_tax_with_allowance() {
    let params = OperatorTradeTaxParams {
        profit_factor: dec!(0.9),
        tax_free_allowance: dec!(24500),
        base_rate: dec!(0.035),
        municipal_multiplier: dec!(3.34),
    };
    // 100000 × 0.9 − 24500 = 65500; × 0.035 = 2292.5
    let t = operator_trade_tax(dec!(100000), &params);
    assert_eq!(t.total, dec!(7656.95));
    assert_eq!(t.municipal_share, dec!(7656.95) - dec!(802.375));
}
