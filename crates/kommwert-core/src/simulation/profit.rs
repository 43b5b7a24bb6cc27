use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::KommWertError;
use crate::simulation::carryforward::LossCarryforward;
use crate::simulation::loan::LoanState;
use crate::tax::trade_tax::{operator_trade_tax, OperatorTradeTaxParams};
use crate::types::{
    decay_factor, with_metadata, ComputationOutput, Money, Rate, YearValue, DEFAULT_HORIZON_YEARS,
};
use crate::KommWertResult;

/// Earliest year that counts as break-even. The grace years of a loan
/// regularly show a profit that the first amortization year wipes out.
pub const BREAK_EVEN_EARLIEST_YEAR: u32 = 3;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

fn default_horizon() -> u32 {
    DEFAULT_HORIZON_YEARS
}

/// Absolute (not per-MW) parameters of one operator scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    #[serde(default)]
    pub name: String,
    pub investment: Money,
    /// Fraction of the investment financed by debt
    pub debt_share: Rate,
    pub interest_rate: Rate,
    pub loan_term_years: u32,
    /// Two interest-only years before amortization starts
    pub grace_period: bool,
    pub operating_cost_first_period: Money,
    pub operating_cost_later_period: Money,
    /// Last year charged at `operating_cost_first_period`
    pub cost_tier_switch_year: u32,
    /// Undegraded annual output in kWh
    pub annual_output_kwh: Decimal,
    pub price_per_kwh: Money,
    /// Undegraded annual participation levy paid by the operator
    pub annual_levy: Money,
    pub annual_depreciation: Money,
    pub depreciation_years: u32,
    pub degradation: Rate,
    pub trade_tax: OperatorTradeTaxParams,
    #[serde(default)]
    pub initial_loss_carryforward: Money,
    #[serde(default = "default_horizon")]
    pub horizon_years: u32,
}

/// Everything booked in one simulated year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyResult {
    pub year: u32,
    pub revenue: Money,
    pub operating_cost: Money,
    pub interest: Money,
    pub amortization: Money,
    pub outstanding_principal: Money,
    pub levy: Money,
    pub depreciation: Money,
    /// Profit before the loss carryforward is applied
    pub profit: Money,
    /// Carryforward balance after this year
    pub loss_carryforward: Money,
    pub taxable_profit: Money,
    pub trade_tax_total: Money,
    pub trade_tax_municipal: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub name: String,
    pub years: Vec<YearlyResult>,
    /// First year from [`BREAK_EVEN_EARLIEST_YEAR`] with a positive profit;
    /// `None` when the plant never turns a profit within the horizon
    pub break_even_year: Option<u32>,
    /// Sum of pre-adjustment profits
    pub cumulative_profit: Money,
    /// Sum of taxable profits after the loss carryforward
    pub cumulative_taxable_profit: Money,
    pub total_municipal_trade_tax: Money,
    pub final_loss_carryforward: Money,
}

impl SimulationOutput {
    /// Municipal trade tax per year, unclamped.
    pub fn trade_tax_series(&self) -> Vec<YearValue> {
        self.years
            .iter()
            .map(|y| YearValue {
                year: y.year,
                value: y.trade_tax_municipal,
            })
            .collect()
    }

    pub fn taxable_profit_series(&self) -> Vec<YearValue> {
        self.years
            .iter()
            .map(|y| YearValue {
                year: y.year,
                value: y.taxable_profit,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Core simulation
// ---------------------------------------------------------------------------

/// Step one scenario through its horizon: debt service, depreciation,
/// operating cost, loss carryforward and operator trade tax per year.
pub fn simulate_scenario(input: &SimulationInput) -> KommWertResult<SimulationOutput> {
    validate_simulation_input(input)?;

    let principal = input.investment * input.debt_share;
    let mut loan = LoanState::new(
        principal,
        input.interest_rate,
        input.loan_term_years,
        input.grace_period,
    )?;
    let mut carryforward = LossCarryforward::new(input.initial_loss_carryforward);

    let mut years = Vec::with_capacity(input.horizon_years as usize);
    let mut break_even_year = None;
    let mut cumulative_profit = Decimal::ZERO;
    let mut cumulative_taxable_profit = Decimal::ZERO;
    let mut total_municipal_trade_tax = Decimal::ZERO;

    for year in 1..=input.horizon_years {
        let operating_cost = if year <= input.cost_tier_switch_year {
            input.operating_cost_first_period
        } else {
            input.operating_cost_later_period
        };

        let depreciation = if year <= input.depreciation_years {
            input.annual_depreciation
        } else {
            Decimal::ZERO
        };

        // Year 1 is undegraded; afterwards the decay exponent is the year itself.
        let decay = if year == 1 {
            Decimal::ONE
        } else {
            decay_factor(input.degradation, year)
        };
        let revenue = input.annual_output_kwh * decay * input.price_per_kwh;
        let levy = input.annual_levy * decay;

        let debt_service = loan.step(year);
        let annual_cost = operating_cost + debt_service.interest + levy;
        let profit = revenue - annual_cost - depreciation;

        let taxable_profit = carryforward.apply(profit);
        let tax = operator_trade_tax(taxable_profit, &input.trade_tax);

        if break_even_year.is_none() && year >= BREAK_EVEN_EARLIEST_YEAR && profit > Decimal::ZERO
        {
            break_even_year = Some(year);
        }
        cumulative_profit += profit;
        cumulative_taxable_profit += taxable_profit;
        total_municipal_trade_tax += tax.municipal_share;

        years.push(YearlyResult {
            year,
            revenue,
            operating_cost,
            interest: debt_service.interest,
            amortization: debt_service.amortization,
            outstanding_principal: debt_service.outstanding_principal,
            levy,
            depreciation,
            profit,
            loss_carryforward: carryforward.balance(),
            taxable_profit,
            trade_tax_total: tax.total,
            trade_tax_municipal: tax.municipal_share,
        });
    }

    log::debug!(
        "scenario '{}': break-even {:?}, municipal trade tax {}",
        input.name,
        break_even_year,
        total_municipal_trade_tax.round_dp(2)
    );

    Ok(SimulationOutput {
        name: input.name.clone(),
        years,
        break_even_year,
        cumulative_profit,
        cumulative_taxable_profit,
        total_municipal_trade_tax,
        final_loss_carryforward: carryforward.balance(),
    })
}

/// [`simulate_scenario`] wrapped in the standard output envelope.
pub fn run_simulation(input: &SimulationInput) -> KommWertResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let output = simulate_scenario(input)?;

    let mut warnings = Vec::new();
    if output.break_even_year.is_none() {
        warnings.push(format!(
            "No profit from year {BREAK_EVEN_EARLIEST_YEAR} within {} years",
            input.horizon_years
        ));
    }
    if output.final_loss_carryforward > Decimal::ZERO {
        warnings.push(format!(
            "Loss carryforward of {} remains unused at the end of the horizon",
            output.final_loss_carryforward.round_dp(2)
        ));
    }

    let assumptions = serde_json::json!({
        "grace_years": if input.grace_period { 2 } else { 0 },
        "fixed_loss_deduction_cap": crate::simulation::carryforward::FIXED_DEDUCTION_CAP.to_string(),
        "excess_loss_offset_rate": crate::simulation::carryforward::EXCESS_OFFSET_RATE.to_string(),
        "trade_tax_profit_factor": input.trade_tax.profit_factor.to_string(),
        "horizon_years": input.horizon_years,
    });

    Ok(with_metadata(
        "Operator profit simulation with loss carryforward and trade tax",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}

fn validate_simulation_input(input: &SimulationInput) -> KommWertResult<()> {
    if input.horizon_years == 0 {
        return Err(KommWertError::InvalidInput {
            field: "horizon_years".into(),
            reason: "Horizon must be at least one year".into(),
        });
    }
    if input.debt_share < Decimal::ZERO || input.debt_share > Decimal::ONE {
        return Err(KommWertError::InvalidInput {
            field: "debt_share".into(),
            reason: "Debt share must be between 0 and 1".into(),
        });
    }
    if input.degradation < Decimal::ZERO || input.degradation >= Decimal::ONE {
        return Err(KommWertError::InvalidInput {
            field: "degradation".into(),
            reason: "Degradation must be in [0, 1)".into(),
        });
    }
    for (field, value) in [
        ("investment", input.investment),
        ("annual_output_kwh", input.annual_output_kwh),
        ("price_per_kwh", input.price_per_kwh),
        ("annual_levy", input.annual_levy),
        ("annual_depreciation", input.annual_depreciation),
        ("initial_loss_carryforward", input.initial_loss_carryforward),
    ] {
        if value < Decimal::ZERO {
            return Err(KommWertError::InvalidInput {
                field: field.into(),
                reason: "Must not be negative".into(),
            });
        }
    }
    Ok(())
}
