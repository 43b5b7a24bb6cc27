use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::KommWertError;
use crate::types::{Money, Rate};
use crate::KommWertResult;

/// Interest-only years at the start of a loan with a grace period.
pub const GRACE_YEARS: u32 = 2;

/// Outstanding debt of one scenario, stepped once per year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    pub outstanding_principal: Money,
    pub annual_amortization: Money,
    pub grace_period: bool,
    original_principal: Money,
    interest_rate: Rate,
    term_years: u32,
}

/// Debt service of one year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanYear {
    pub interest: Money,
    pub amortization: Money,
    /// Principal left after this year's amortization
    pub outstanding_principal: Money,
}

impl LoanState {
    /// Straight-line loan over `term_years`. With a grace period the first
    /// two years are interest-only and the principal is repaid over the
    /// remaining `term_years − 2`.
    pub fn new(
        principal: Money,
        interest_rate: Rate,
        term_years: u32,
        grace_period: bool,
    ) -> KommWertResult<Self> {
        if principal < Decimal::ZERO {
            return Err(KommWertError::InvalidInput {
                field: "principal".into(),
                reason: "Loan principal cannot be negative".into(),
            });
        }
        if interest_rate < Decimal::ZERO {
            return Err(KommWertError::InvalidInput {
                field: "interest_rate".into(),
                reason: "Interest rate cannot be negative".into(),
            });
        }

        let amortizing_years = if grace_period {
            term_years.saturating_sub(GRACE_YEARS)
        } else {
            term_years
        };
        if amortizing_years == 0 {
            return Err(KommWertError::ComputationDomain {
                function: "LoanState::new".into(),
                reason: format!(
                    "Loan term of {term_years} years leaves no amortizing years (grace period: {grace_period})"
                ),
            });
        }

        Ok(LoanState {
            outstanding_principal: principal,
            annual_amortization: principal / Decimal::from(amortizing_years),
            grace_period,
            original_principal: principal,
            interest_rate,
            term_years,
        })
    }

    pub fn is_grace_year(&self, year: u32) -> bool {
        self.grace_period && year <= GRACE_YEARS
    }

    /// Advance the loan by one year.
    ///
    /// The final scheduled year repays whatever is left, so decimal residue
    /// from the straight-line division never outlives the term.
    pub fn step(&mut self, year: u32) -> LoanYear {
        if self.is_grace_year(year) {
            return LoanYear {
                interest: self.original_principal * self.interest_rate,
                amortization: Decimal::ZERO,
                outstanding_principal: self.outstanding_principal,
            };
        }

        let interest = self.outstanding_principal * self.interest_rate;
        let amortization = if year >= self.term_years {
            self.outstanding_principal
        } else {
            self.annual_amortization.min(self.outstanding_principal)
        };
        self.outstanding_principal = (self.outstanding_principal - amortization).max(Decimal::ZERO);

        LoanYear {
            interest,
            amortization,
            outstanding_principal: self.outstanding_principal,
        }
    }
}
