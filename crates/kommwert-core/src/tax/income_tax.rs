use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::KommWertError;
use crate::types::Money;
use crate::KommWertResult;

/// Upper bound of the zero-rate bracket (Grundfreibetrag)
pub const BASIC_ALLOWANCE: Decimal = dec!(11604);
/// Upper bound of the first progression zone
pub const FIRST_ZONE_END: Decimal = dec!(17005);
/// Upper bound of the second progression zone
pub const SECOND_ZONE_END: Decimal = dec!(66760);
/// Upper bound of the 42% proportional zone
pub const PROPORTIONAL_ZONE_END: Decimal = dec!(277825);

/// German personal income tax on a single assessment (§32a EStG, 2024 tariff).
///
/// The income is truncated to whole euros before the bracket lookup and the
/// result is rounded half-to-even to whole euros:
///
/// | income `x`              | tax                                   |
/// |-------------------------|---------------------------------------|
/// | `x <= 11 604`           | 0                                     |
/// | `x <= 17 005`           | `(922.98·y + 1400)·y`, `y = (x − 11 604) / 10 000` |
/// | `x <= 66 760`           | `(181.19·z + 2397)·z + 1025.38`, `z = (x − 17 005) / 10 000` |
/// | `x <= 277 825`          | `0.42·x − 10 602.13`                  |
/// | otherwise               | `0.45·x − 18 936.88`                  |
pub fn personal_income_tax(taxable_income: Money) -> KommWertResult<Money> {
    Ok(tariff(taxable_income, "personal_income_tax")?.round_dp(0))
}

/// Tariff value before rounding.
fn tariff(taxable_income: Money, function: &str) -> KommWertResult<Decimal> {
    if taxable_income < Decimal::ZERO {
        return Err(KommWertError::ComputationDomain {
            function: function.into(),
            reason: format!("Taxable income cannot be negative, got {taxable_income}"),
        });
    }

    let income = taxable_income.trunc();

    let tax = if income <= BASIC_ALLOWANCE {
        Decimal::ZERO
    } else if income <= FIRST_ZONE_END {
        let y = (income - BASIC_ALLOWANCE) / dec!(10000);
        (dec!(922.98) * y + dec!(1400)) * y
    } else if income <= SECOND_ZONE_END {
        let z = (income - FIRST_ZONE_END) / dec!(10000);
        (dec!(181.19) * z + dec!(2397)) * z + dec!(1025.38)
    } else if income <= PROPORTIONAL_ZONE_END {
        dec!(0.42) * income - dec!(10602.13)
    } else {
        dec!(0.45) * income - dec!(18936.88)
    };

    Ok(tax)
}

/// Additional income tax caused by `extra_income` on top of `base_income`.
///
/// The tax with the extra income is rounded like [`personal_income_tax`];
/// the tax on `base_income` alone is truncated to whole euros.
pub fn income_tax_delta(base_income: Money, extra_income: Money) -> KommWertResult<Money> {
    let with_extra = personal_income_tax(base_income + extra_income)?;
    let without = tariff(base_income, "income_tax_delta")?.trunc();
    Ok(with_extra - without)
}
