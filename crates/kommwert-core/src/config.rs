use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::KommWertError;
use crate::types::{
    Megawatts, Money, PerTechnology, Rate, TechnologyKind, DEFAULT_HORIZON_YEARS,
};
use crate::KommWertResult;

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Policy and market constants for one model run.
///
/// Every section falls back to its `Default`, so a configuration file only
/// needs to name the values it changes. The structure is passed by reference
/// into every component; nothing in the crate keeps process-wide state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub tax: TaxConfig,
    pub lease: LeaseConfig,
    pub levy: LevyConfig,
    pub capacity: CapacityConfig,
    pub scenarios: PerTechnology<ScenarioDefinition>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            tax: TaxConfig::default(),
            lease: LeaseConfig::default(),
            levy: LevyConfig::default(),
            capacity: CapacityConfig::default(),
            scenarios: default_scenarios(),
        }
    }
}

/// Income and trade tax reference values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TaxConfig {
    /// Average annual income of a private landowner before lease income
    pub reference_private_income: Money,
    /// Annual profit of a commercial landowner before lease income
    pub reference_commercial_income: Money,
    /// Trade-tax allowance applied to commercial landowners
    pub trade_tax_allowance: Money,
    /// Trade-tax base rate (Steuermesszahl)
    pub trade_tax_base_rate: Rate,
    /// Municipal share of the income tax collected from residents
    pub municipal_income_tax_share: Rate,
    /// Municipal multiplier (Hebesatz / 100) used when the caller sends none
    pub fallback_municipal_multiplier: Decimal,
    /// Local surcharge multiplier used when the caller sends none
    pub fallback_local_surcharge: Decimal,
    /// Share of operator profit that enters the trade-tax assessment
    pub trade_tax_profit_factor: Rate,
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig {
            reference_private_income: dec!(24122),
            reference_commercial_income: dec!(220000),
            trade_tax_allowance: dec!(24500),
            trade_tax_base_rate: dec!(0.035),
            municipal_income_tax_share: dec!(0.15),
            fallback_municipal_multiplier: dec!(3.34),
            fallback_local_surcharge: dec!(0.3),
            trade_tax_profit_factor: dec!(0.9),
        }
    }
}

/// Annual lease paid to landowners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeaseConfig {
    /// EUR per hectare and year for ground-mounted PV
    pub ground_pv_per_ha: Money,
    /// EUR per hectare and year for both agri-PV variants
    pub agri_pv_per_ha: Money,
    /// EUR per installed MW and year for wind
    pub wind_per_mw: Money,
}

impl Default for LeaseConfig {
    fn default() -> Self {
        LeaseConfig {
            ground_pv_per_ha: dec!(3000),
            agri_pv_per_ha: dec!(830),
            wind_per_mw: dec!(16000),
        }
    }
}

/// Participation levy, state bonus and degradation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LevyConfig {
    /// EEG participation payment, EUR per MWh fed in
    pub participation_levy_per_mwh: Money,
    /// Wind-Euro, EUR per installed MW and year
    pub wind_bonus_per_mw: Money,
    /// Solar-Euro, EUR per installed MW and year
    pub solar_bonus_per_mw: Money,
    /// Lump sum paid per block of legacy approved capacity
    pub legacy_bonus_per_block: Money,
    /// MW per legacy block
    pub legacy_block_mw: Megawatts,
    pub wind_degradation: Rate,
    pub solar_degradation: Rate,
    pub horizon_years: u32,
}

impl Default for LevyConfig {
    fn default() -> Self {
        LevyConfig {
            participation_levy_per_mwh: dec!(2),
            wind_bonus_per_mw: dec!(5000),
            solar_bonus_per_mw: dec!(2000),
            legacy_bonus_per_block: dec!(10000),
            legacy_block_mw: dec!(6),
            wind_degradation: dec!(0.006),
            solar_degradation: dec!(0.005),
            horizon_years: DEFAULT_HORIZON_YEARS,
        }
    }
}

impl LevyConfig {
    pub fn degradation(&self, kind: TechnologyKind) -> Rate {
        if kind.is_solar() {
            self.solar_degradation
        } else {
            self.wind_degradation
        }
    }
}

/// Area/capacity conversion and investment cost tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CapacityConfig {
    /// Turbine footprint in m² per squared rotor diameter.
    ///
    /// The default `3π` is `π·D·5·D·3 / 5`: an ellipse of five by three rotor
    /// diameters shared between neighbouring turbines.
    pub turbine_footprint_factor: Decimal,
    pub default_rotor_diameter_m: Decimal,
    pub default_rated_unit_output_mw: Megawatts,
    pub agri_pv_vertical_mw_per_ha: Decimal,
    pub agri_pv_horizontal_mw_per_ha: Decimal,
    pub investment_tiers: InvestmentCostTiers,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        CapacityConfig {
            turbine_footprint_factor: dec!(3) * Decimal::PI,
            default_rotor_diameter_m: dec!(130),
            default_rated_unit_output_mw: dec!(4),
            agri_pv_vertical_mw_per_ha: dec!(0.35),
            agri_pv_horizontal_mw_per_ha: dec!(0.65),
            investment_tiers: InvestmentCostTiers::default(),
        }
    }
}

/// One row of a tiered lookup: applies when the key is strictly below `below`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostTier {
    pub below: Decimal,
    pub cost_per_mw: Money,
}

/// Investment cost per MW, by technology.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InvestmentCostTiers {
    /// Keyed on the rated output of a single turbine, ascending
    pub wind: Vec<CostTier>,
    pub wind_otherwise: Money,
    /// Cost for a ground-PV park of exactly 1 MW (checked before `solar`)
    pub solar_exactly_one_mw: Money,
    /// Keyed on total installed capacity, ascending
    pub solar: Vec<CostTier>,
    pub solar_otherwise: Money,
    pub agri_pv_vertical_markup: Decimal,
    pub agri_pv_horizontal_markup: Decimal,
}

impl Default for InvestmentCostTiers {
    fn default() -> Self {
        InvestmentCostTiers {
            wind: vec![
                CostTier {
                    below: dec!(4),
                    cost_per_mw: dec!(1846000),
                },
                CostTier {
                    below: dec!(5),
                    cost_per_mw: dec!(1676000),
                },
                CostTier {
                    below: dec!(6),
                    cost_per_mw: dec!(1556000),
                },
            ],
            wind_otherwise: dec!(1561000),
            solar_exactly_one_mw: dec!(840000),
            solar: vec![
                CostTier {
                    below: dec!(2),
                    cost_per_mw: dec!(800000),
                },
                CostTier {
                    below: dec!(5),
                    cost_per_mw: dec!(770000),
                },
            ],
            solar_otherwise: dec!(750000),
            agri_pv_vertical_markup: dec!(1.108),
            agri_pv_horizontal_markup: dec!(1.26),
        }
    }
}

// ---------------------------------------------------------------------------
// Scenario definitions
// ---------------------------------------------------------------------------

/// Per-MW financial constants of an operator scenario.
///
/// The simulator works on absolute amounts; `revenue::scenarios` scales these
/// by the normalized capacity of the technology.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioDefinition {
    /// Annual yield in kWh per installed MW
    pub yield_per_mw_kwh: Decimal,
    /// Remuneration in EUR per kWh
    pub price_per_kwh: Money,
    pub opex_per_mw_first_period: Money,
    pub opex_per_mw_later_period: Money,
    /// Last year charged at the first-period operating cost
    pub cost_tier_switch_year: u32,
    /// State bonus paid by the operator, charged as an operating cost
    pub state_bonus_per_mw: Money,
    pub debt_share: Rate,
    pub interest_rate: Rate,
    pub loan_term_years: u32,
    /// Two interest-only years before amortization starts
    pub grace_period: bool,
    pub depreciation_years: u32,
    pub trade_tax_allowance: Money,
    pub degradation: Rate,
    /// Capacity approved under the legacy bonus rules
    #[serde(default)]
    pub legacy_approved_capacity_mw: Megawatts,
    #[serde(default)]
    pub initial_loss_carryforward: Money,
}

fn solar_definition(
    yield_per_mw_kwh: Decimal,
    price_per_kwh: Money,
    opex_per_mw: Money,
) -> ScenarioDefinition {
    ScenarioDefinition {
        yield_per_mw_kwh,
        price_per_kwh,
        opex_per_mw_first_period: opex_per_mw,
        opex_per_mw_later_period: opex_per_mw,
        cost_tier_switch_year: 10,
        state_bonus_per_mw: dec!(2000),
        debt_share: dec!(0.8),
        interest_rate: dec!(0.03),
        loan_term_years: 15,
        grace_period: true,
        depreciation_years: 20,
        trade_tax_allowance: dec!(24500),
        degradation: dec!(0.005),
        legacy_approved_capacity_mw: Decimal::ZERO,
        initial_loss_carryforward: Decimal::ZERO,
    }
}

/// Reference scenarios for a 100% build-out of every technology.
pub fn default_scenarios() -> PerTechnology<ScenarioDefinition> {
    PerTechnology {
        wind: ScenarioDefinition {
            yield_per_mw_kwh: dec!(2550000),
            price_per_kwh: dec!(0.0828),
            opex_per_mw_first_period: dec!(44000),
            opex_per_mw_later_period: dec!(53000),
            cost_tier_switch_year: 10,
            state_bonus_per_mw: dec!(5000),
            debt_share: dec!(0.8),
            interest_rate: dec!(0.05),
            loan_term_years: 15,
            grace_period: true,
            depreciation_years: 16,
            trade_tax_allowance: Decimal::ZERO,
            degradation: dec!(0.006),
            legacy_approved_capacity_mw: Decimal::ZERO,
            initial_loss_carryforward: Decimal::ZERO,
        },
        ground_pv: solar_definition(dec!(1000000), dec!(0.073), dec!(14300)),
        agri_pv_vertical: solar_definition(dec!(831000), dec!(0.088), dec!(11440)),
        agri_pv_horizontal: solar_definition(dec!(945000), dec!(0.088), dec!(12870)),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl ModelConfig {
    /// Reject configurations that would make a component divide by zero or
    /// produce meaningless rates.
    pub fn validate(&self) -> KommWertResult<()> {
        check_rate("tax.trade_tax_base_rate", self.tax.trade_tax_base_rate)?;
        check_rate(
            "tax.municipal_income_tax_share",
            self.tax.municipal_income_tax_share,
        )?;
        check_rate("tax.trade_tax_profit_factor", self.tax.trade_tax_profit_factor)?;
        check_positive(
            "tax.fallback_municipal_multiplier",
            self.tax.fallback_municipal_multiplier,
        )?;
        check_non_negative("tax.fallback_local_surcharge", self.tax.fallback_local_surcharge)?;

        check_non_negative("lease.ground_pv_per_ha", self.lease.ground_pv_per_ha)?;
        check_non_negative("lease.agri_pv_per_ha", self.lease.agri_pv_per_ha)?;
        check_non_negative("lease.wind_per_mw", self.lease.wind_per_mw)?;

        check_rate("levy.wind_degradation", self.levy.wind_degradation)?;
        check_rate("levy.solar_degradation", self.levy.solar_degradation)?;
        check_positive("levy.legacy_block_mw", self.levy.legacy_block_mw)?;
        if self.levy.horizon_years == 0 {
            return Err(KommWertError::InvalidInput {
                field: "levy.horizon_years".into(),
                reason: "Horizon must be at least one year".into(),
            });
        }

        check_positive(
            "capacity.turbine_footprint_factor",
            self.capacity.turbine_footprint_factor,
        )?;
        check_positive(
            "capacity.agri_pv_vertical_mw_per_ha",
            self.capacity.agri_pv_vertical_mw_per_ha,
        )?;
        check_positive(
            "capacity.agri_pv_horizontal_mw_per_ha",
            self.capacity.agri_pv_horizontal_mw_per_ha,
        )?;
        check_ascending("capacity.investment_tiers.wind", &self.capacity.investment_tiers.wind)?;
        check_ascending(
            "capacity.investment_tiers.solar",
            &self.capacity.investment_tiers.solar,
        )?;

        for (kind, def) in self.scenarios.iter() {
            def.validate(&format!("scenarios.{kind}"))?;
        }

        Ok(())
    }
}

impl ScenarioDefinition {
    pub fn validate(&self, prefix: &str) -> KommWertResult<()> {
        check_rate(&format!("{prefix}.debt_share"), self.debt_share)?;
        check_rate(&format!("{prefix}.interest_rate"), self.interest_rate)?;
        check_rate(&format!("{prefix}.degradation"), self.degradation)?;
        check_non_negative(&format!("{prefix}.yield_per_mw_kwh"), self.yield_per_mw_kwh)?;
        check_non_negative(&format!("{prefix}.price_per_kwh"), self.price_per_kwh)?;
        check_non_negative(
            &format!("{prefix}.legacy_approved_capacity_mw"),
            self.legacy_approved_capacity_mw,
        )?;
        check_non_negative(
            &format!("{prefix}.initial_loss_carryforward"),
            self.initial_loss_carryforward,
        )?;
        let min_term = if self.grace_period { 3 } else { 1 };
        if self.loan_term_years < min_term {
            return Err(KommWertError::InvalidInput {
                field: format!("{prefix}.loan_term_years"),
                reason: format!(
                    "Loan term must be at least {min_term} years (grace period: {})",
                    self.grace_period
                ),
            });
        }
        Ok(())
    }
}

fn check_rate(field: &str, value: Rate) -> KommWertResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(KommWertError::InvalidInput {
            field: field.into(),
            reason: format!("Rate must be between 0 and 1, got {value}"),
        });
    }
    Ok(())
}

fn check_positive(field: &str, value: Decimal) -> KommWertResult<()> {
    if value <= Decimal::ZERO {
        return Err(KommWertError::InvalidInput {
            field: field.into(),
            reason: format!("Must be positive, got {value}"),
        });
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Decimal) -> KommWertResult<()> {
    if value < Decimal::ZERO {
        return Err(KommWertError::InvalidInput {
            field: field.into(),
            reason: format!("Cannot be negative, got {value}"),
        });
    }
    Ok(())
}

fn check_ascending(field: &str, tiers: &[CostTier]) -> KommWertResult<()> {
    if tiers.windows(2).any(|w| w[0].below >= w[1].below) {
        return Err(KommWertError::InvalidInput {
            field: field.into(),
            reason: "Tier thresholds must be strictly ascending".into(),
        });
    }
    Ok(())
}
