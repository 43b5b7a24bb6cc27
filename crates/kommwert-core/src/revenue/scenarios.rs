use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::capacity::normalizer::NormalizedCapacity;
use crate::config::{ModelConfig, ScenarioDefinition};
use crate::error::KommWertError;
use crate::levies::participation::annual_levy;
use crate::levies::state_bonus::operator_bonus_charge;
use crate::profile::OutputProfile;
use crate::simulation::profit::{simulate_scenario, SimulationInput, SimulationOutput};
use crate::tax::trade_tax::OperatorTradeTaxParams;
use crate::types::{PerTechnology, TechnologyKind};
use crate::KommWertResult;

/// Scale a per-MW scenario definition to the normalized capacity of one
/// technology.
pub fn scenario_input(
    definition: &ScenarioDefinition,
    capacity: &NormalizedCapacity,
    profile: Option<&OutputProfile>,
    municipal_multiplier: Decimal,
    config: &ModelConfig,
) -> KommWertResult<SimulationInput> {
    let kind = capacity.kind;
    let mw = capacity.capacity_mw;

    let investment = capacity.investment_cost_per_mw * mw;
    let annual_depreciation = if definition.depreciation_years == 0 {
        Decimal::ZERO
    } else {
        investment / Decimal::from(definition.depreciation_years)
    };

    // The operator pays the full levy regardless of the municipality's share.
    let levy = match profile {
        Some(p) => annual_levy(p, mw, config.levy.participation_levy_per_mwh),
        None if mw.is_zero() => Decimal::ZERO,
        None => {
            return Err(KommWertError::MissingInput {
                field: format!("{kind}.profile"),
            })
        }
    };

    let bonus_charge = operator_bonus_charge(
        mw,
        definition.legacy_approved_capacity_mw,
        definition.state_bonus_per_mw,
        &config.levy,
    );

    Ok(SimulationInput {
        name: kind.to_string(),
        investment,
        debt_share: definition.debt_share,
        interest_rate: definition.interest_rate,
        loan_term_years: definition.loan_term_years,
        grace_period: definition.grace_period,
        operating_cost_first_period: definition.opex_per_mw_first_period * mw + bonus_charge,
        operating_cost_later_period: definition.opex_per_mw_later_period * mw + bonus_charge,
        cost_tier_switch_year: definition.cost_tier_switch_year,
        annual_output_kwh: definition.yield_per_mw_kwh * mw,
        price_per_kwh: definition.price_per_kwh,
        annual_levy: levy,
        annual_depreciation,
        depreciation_years: definition.depreciation_years,
        degradation: definition.degradation,
        trade_tax: OperatorTradeTaxParams {
            profit_factor: config.tax.trade_tax_profit_factor,
            tax_free_allowance: definition.trade_tax_allowance,
            base_rate: config.tax.trade_tax_base_rate,
            municipal_multiplier,
        },
        initial_loss_carryforward: definition.initial_loss_carryforward,
        horizon_years: config.levy.horizon_years,
    })
}

/// Simulate the operator scenario of every technology. Any failing scenario
/// fails the whole run.
pub fn run_scenarios(
    capacities: &PerTechnology<NormalizedCapacity>,
    profiles: &PerTechnology<Option<OutputProfile>>,
    municipal_multiplier: Decimal,
    config: &ModelConfig,
) -> KommWertResult<BTreeMap<TechnologyKind, SimulationOutput>> {
    let mut results = BTreeMap::new();
    for kind in TechnologyKind::ALL {
        let input = scenario_input(
            config.scenarios.get(kind),
            capacities.get(kind),
            profiles.get(kind).as_ref(),
            municipal_multiplier,
            config,
        )?;
        log::debug!(
            "running {kind} scenario: investment={}, output={} kWh",
            input.investment.round_dp(2),
            input.annual_output_kwh
        );
        results.insert(kind, simulate_scenario(&input)?);
    }
    Ok(results)
}
