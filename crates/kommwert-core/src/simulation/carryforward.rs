use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Loss that may be offset against profit in full each year.
pub const FIXED_DEDUCTION_CAP: Money = dec!(1_000_000);

/// Share of the profit above the fixed cap that losses may still offset
/// (minimum taxation, §10d EStG).
pub const EXCESS_OFFSET_RATE: Rate = dec!(0.6);

/// Running loss carryforward of one scenario.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LossCarryforward {
    balance: Money,
}

impl LossCarryforward {
    pub fn new(seed: Money) -> Self {
        LossCarryforward {
            balance: seed.max(Decimal::ZERO),
        }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Book one year's profit and return the taxable profit.
    ///
    /// A loss is added to the balance and leaves nothing taxable. A profit is
    /// first reduced by up to [`FIXED_DEDUCTION_CAP`]; any balance still left
    /// offsets at most [`EXCESS_OFFSET_RATE`] of the reduced profit.
    pub fn apply(&mut self, profit: Money) -> Money {
        if profit < Decimal::ZERO {
            self.balance += -profit;
            return Decimal::ZERO;
        }

        let mut taxable = profit;
        if self.balance > Decimal::ZERO && taxable > Decimal::ZERO {
            let deduction = FIXED_DEDUCTION_CAP.min(taxable).min(self.balance);
            taxable -= deduction;
            self.balance -= deduction;

            if self.balance > Decimal::ZERO {
                let excess_limit = taxable * EXCESS_OFFSET_RATE;
                if self.balance > excess_limit {
                    self.balance -= excess_limit;
                    taxable *= Decimal::ONE - EXCESS_OFFSET_RATE;
                } else {
                    taxable -= self.balance;
                    self.balance = Decimal::ZERO;
                }
            }
        }

        taxable
    }
}
