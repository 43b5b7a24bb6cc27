use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::capacity::normalizer::{normalize_all, NormalizedCapacity, SuppliedCapacity, WindGeometry};
use crate::config::ModelConfig;
use crate::error::KommWertError;
use crate::land::allocation::{
    allocate_technology, annual_lease, AllocationParams, MunicipalRevenueComponents,
};
use crate::land::ownership::{checked_shares, OwnershipShare};
use crate::levies::participation::{participation_levy, ParticipationLevyOutput};
use crate::levies::state_bonus::{state_bonus, StateBonusOutput};
use crate::profile::OutputProfile;
use crate::revenue::groups::{
    artifact_name, group_trade_tax, trade_tax_chart, ChartData, ChartSeries, GroupTradeTax,
    ReportingGroup, RevenueOverview,
};
use crate::revenue::scenarios::run_scenarios;
use crate::simulation::profit::SimulationOutput;
use crate::types::{with_metadata, ComputationOutput, Money, PerTechnology, Rate, TechnologyKind};
use crate::KommWertResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// What the caller knows about one technology.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnologyInput {
    /// Area in hectares; zero when only the capacity is known
    #[serde(default)]
    pub area_ha: Decimal,
    /// Installed MW; zero when only the area is known
    #[serde(default)]
    pub capacity_mw: Decimal,
    #[serde(default)]
    pub ownership: Vec<OwnershipShare>,
    #[serde(default)]
    pub profile: Option<OutputProfile>,
}

/// Input of a full municipal revenue estimate.
///
/// The optional policy fields treat zero like an absent value, since the
/// input form submits blank fields as zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimateInput {
    #[serde(default)]
    pub technologies: PerTechnology<TechnologyInput>,
    pub rotor_diameter_m: Option<Decimal>,
    pub rated_unit_output_mw: Option<Decimal>,
    /// Fraction of the wind levy offered to the municipality
    pub wind_participation_share: Option<Rate>,
    /// Fraction of wind capacity covered by the Wind-Euro
    pub wind_bonus_share: Option<Rate>,
    /// Hebesatz in percent, e.g. 334
    pub municipal_multiplier_percent: Option<Decimal>,
    /// Local income-tax surcharge rate, e.g. 0.003
    pub local_surcharge_rate: Option<Decimal>,
}

/// Everything computed for one technology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyEstimate {
    pub capacity: NormalizedCapacity,
    /// Annual lease if the whole area were leased
    pub annual_lease: Money,
    pub lease_revenue: MunicipalRevenueComponents,
    pub participation_levy: ParticipationLevyOutput,
    pub state_bonus: StateBonusOutput,
}

/// Results folded into one reporting group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: ReportingGroup,
    pub lease_revenue: MunicipalRevenueComponents,
    pub annual_participation_levy: Money,
    pub degraded_participation_levy: Money,
    pub annual_state_bonus: Money,
    pub trade_tax: GroupTradeTax,
    pub overview: RevenueOverview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateOutput {
    /// Multiplier applied to the trade-tax base assessment
    pub municipal_multiplier: Decimal,
    /// Multiplier applied to the municipal income-tax share
    pub local_surcharge: Decimal,
    pub horizon_years: u32,
    pub technologies: PerTechnology<TechnologyEstimate>,
    pub scenarios: BTreeMap<TechnologyKind, SimulationOutput>,
    pub groups: BTreeMap<ReportingGroup, GroupSummary>,
    /// Unix timestamp suffixed to every chart artifact
    pub run_timestamp: i64,
    pub charts: Vec<ChartData>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Estimate the municipal revenue of a renewable build-out.
///
/// Normalizes area and capacity, allocates lease income by ownership, derives
/// participation levy and state bonus, simulates the operator scenarios for
/// plant trade tax and folds everything into the three reporting groups.
pub fn estimate_municipal_revenue(
    input: &EstimateInput,
    config: &ModelConfig,
) -> KommWertResult<ComputationOutput<EstimateOutput>> {
    estimate_at(input, config, Utc::now().timestamp())
}

/// [`estimate_municipal_revenue`] with a fixed run timestamp.
pub fn estimate_at(
    input: &EstimateInput,
    config: &ModelConfig,
    run_timestamp: i64,
) -> KommWertResult<ComputationOutput<EstimateOutput>> {
    let start = Instant::now();
    config.validate()?;
    let mut warnings: Vec<String> = Vec::new();

    let municipal_multiplier = resolve_multiplier(input, config, &mut warnings)?;
    let local_surcharge = resolve_surcharge(input, config, &mut warnings)?;
    let participation_share = resolve_share("wind_participation_share", input.wind_participation_share)?;
    let bonus_share = resolve_share("wind_bonus_share", input.wind_bonus_share)?;

    // --- Capacity ---
    let geometry = WindGeometry::from_config(
        input.rotor_diameter_m,
        input.rated_unit_output_mw,
        &config.capacity,
    );
    let supplied = PerTechnology::from_fn(|kind| {
        let t = input.technologies.get(kind);
        SuppliedCapacity {
            area_ha: t.area_ha,
            capacity_mw: t.capacity_mw,
        }
    });
    let capacities = normalize_all(&supplied, &geometry, &config.capacity)?;
    for (kind, cap) in capacities.iter() {
        if !cap.is_configured() {
            warnings.push(format!("{kind}: no area or capacity given, contributes nothing"));
        }
    }

    // --- Leases, levy, bonus ---
    let params = AllocationParams::new(&config.tax, municipal_multiplier, local_surcharge);
    let technologies = PerTechnology::try_from_fn(|kind| {
        let t = input.technologies.get(kind);
        let cap = capacities.get(kind);

        let shares = checked_shares(&format!("{kind}.ownership"), &t.ownership, &mut warnings)?;
        let lease = annual_lease(kind, cap.area_ha, cap.capacity_mw, &config.lease);
        let lease_revenue = allocate_technology(lease, &shares, &params)?;

        let share = if kind == TechnologyKind::Wind {
            participation_share
        } else {
            Decimal::ONE
        };
        let levy = participation_levy(
            kind,
            t.profile.as_ref(),
            cap.capacity_mw,
            share,
            &config.levy,
        )?;
        let bonus = state_bonus(kind, cap.capacity_mw, bonus_share, &config.levy)?;

        Ok::<_, KommWertError>(TechnologyEstimate {
            capacity: cap.clone(),
            annual_lease: lease,
            lease_revenue,
            participation_levy: levy,
            state_bonus: bonus,
        })
    })?;

    // --- Operator scenarios ---
    let profiles = PerTechnology::from_fn(|kind| input.technologies.get(kind).profile.clone());
    let scenarios = run_scenarios(&capacities, &profiles, municipal_multiplier, config)?;
    for (kind, out) in &scenarios {
        if capacities.get(*kind).capacity_mw > Decimal::ZERO && out.break_even_year.is_none() {
            warnings.push(format!(
                "{kind}: operator scenario never turns a profit within {} years",
                config.levy.horizon_years
            ));
        }
    }

    // --- Groups ---
    let horizon = config.levy.horizon_years;
    let groups: BTreeMap<ReportingGroup, GroupSummary> = ReportingGroup::ALL
        .into_iter()
        .map(|group| {
            (
                group,
                summarize_group(group, &technologies, &scenarios, horizon),
            )
        })
        .collect();

    let charts = build_charts(&groups, run_timestamp);

    let assumptions = serde_json::json!({
        "municipal_multiplier": municipal_multiplier.to_string(),
        "local_surcharge": local_surcharge.to_string(),
        "wind_participation_share": participation_share.to_string(),
        "wind_bonus_share": bonus_share.to_string(),
        "rotor_diameter_m": geometry.rotor_diameter_m.to_string(),
        "rated_unit_output_mw": geometry.rated_unit_output_mw.to_string(),
        "turbine_footprint_factor": geometry.footprint_factor.to_string(),
        "horizon_years": horizon,
    });

    let output = EstimateOutput {
        municipal_multiplier,
        local_surcharge,
        horizon_years: horizon,
        technologies,
        scenarios,
        groups,
        run_timestamp,
        charts,
    };

    Ok(with_metadata(
        "Municipal revenue from leases, participation levy, state bonus and plant trade tax",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_multiplier(
    input: &EstimateInput,
    config: &ModelConfig,
    warnings: &mut Vec<String>,
) -> KommWertResult<Decimal> {
    match input.municipal_multiplier_percent {
        Some(p) if p < Decimal::ZERO => Err(KommWertError::InvalidInput {
            field: "municipal_multiplier_percent".into(),
            reason: "Multiplier cannot be negative".into(),
        }),
        Some(p) if !p.is_zero() => Ok(p / dec!(100)),
        _ => {
            warnings.push(format!(
                "No municipal multiplier given, using {}",
                config.tax.fallback_municipal_multiplier
            ));
            Ok(config.tax.fallback_municipal_multiplier)
        }
    }
}

fn resolve_surcharge(
    input: &EstimateInput,
    config: &ModelConfig,
    warnings: &mut Vec<String>,
) -> KommWertResult<Decimal> {
    match input.local_surcharge_rate {
        Some(r) if r < Decimal::ZERO => Err(KommWertError::InvalidInput {
            field: "local_surcharge_rate".into(),
            reason: "Surcharge rate cannot be negative".into(),
        }),
        Some(r) if !r.is_zero() => Ok(r * dec!(100)),
        _ => {
            warnings.push(format!(
                "No local surcharge rate given, using multiplier {}",
                config.tax.fallback_local_surcharge
            ));
            Ok(config.tax.fallback_local_surcharge)
        }
    }
}

/// Unset or zero means the full share.
fn resolve_share(field: &str, share: Option<Rate>) -> KommWertResult<Rate> {
    match share {
        Some(s) if s < Decimal::ZERO || s > Decimal::ONE => Err(KommWertError::InvalidInput {
            field: field.into(),
            reason: format!("Share must be between 0 and 1, got {s}"),
        }),
        Some(s) if !s.is_zero() => Ok(s),
        _ => Ok(Decimal::ONE),
    }
}

fn summarize_group(
    group: ReportingGroup,
    technologies: &PerTechnology<TechnologyEstimate>,
    scenarios: &BTreeMap<TechnologyKind, SimulationOutput>,
    horizon_years: u32,
) -> GroupSummary {
    let mut lease_revenue = MunicipalRevenueComponents::default();
    let mut annual_levy = Decimal::ZERO;
    let mut degraded_levy = Decimal::ZERO;
    let mut annual_bonus = Decimal::ZERO;

    for kind in group.members() {
        let t = technologies.get(*kind);
        lease_revenue += t.lease_revenue;
        annual_levy += t.participation_levy.annual_levy;
        degraded_levy += t.participation_levy.degraded.total;
        annual_bonus += t.state_bonus.annual_bonus;
    }

    let trade_tax = group_trade_tax(group, scenarios, horizon_years);
    let years = Decimal::from(horizon_years);
    let overview = RevenueOverview::new(
        trade_tax.total,
        annual_bonus * years,
        degraded_levy,
        lease_revenue.direct_lease_income,
        lease_revenue.trade_tax_share,
        lease_revenue.income_tax_share,
    );

    GroupSummary {
        group,
        lease_revenue,
        annual_participation_levy: annual_levy,
        degraded_participation_levy: degraded_levy,
        annual_state_bonus: annual_bonus,
        trade_tax,
        overview,
    }
}

/// Series for one bar chart: one entry per reporting group.
fn per_group(
    groups: &BTreeMap<ReportingGroup, GroupSummary>,
    label: &str,
    value: impl Fn(&GroupSummary) -> Money,
) -> ChartSeries {
    ChartSeries {
        label: label.to_string(),
        values: groups.values().map(|g| value(g).max(Decimal::ZERO)).collect(),
    }
}

fn build_charts(groups: &BTreeMap<ReportingGroup, GroupSummary>, timestamp: i64) -> Vec<ChartData> {
    let mut charts = vec![
        ChartData {
            artifact: artifact_name("komm-wert-jaehrliche-pachteinnahmen", timestamp),
            title: "Jährl. Einnahmen aus Flächenpacht".into(),
            series: vec![
                per_group(groups, "Pachteinnahmen", |g| g.lease_revenue.direct_lease_income),
                per_group(groups, "Komm. EKSt-Anteil", |g| g.lease_revenue.income_tax_share),
                per_group(groups, "Komm. GewSt-Anteil", |g| g.lease_revenue.trade_tax_share),
            ],
        },
        ChartData {
            artifact: artifact_name("komm-wert-eeg-einnahmen", timestamp),
            title: "Jährl. Einnahmen durch § 6 EEG".into(),
            series: vec![per_group(groups, "EEG", |g| g.annual_participation_levy)],
        },
        ChartData {
            artifact: artifact_name("einnahmen-wind-solar-euro", timestamp),
            title: "Jährl. Einnahmen durch Wind- und Solar-Euro".into(),
            series: vec![per_group(groups, "Wind-/Solar-Euro", |g| g.annual_state_bonus)],
        },
        ChartData {
            artifact: artifact_name("ueberblick-gemeindeeinnahmen", timestamp),
            title: "Gemeindeeinnahmen über 25 Jahre".into(),
            series: vec![
                per_group(groups, "GewSt Anlagenbetreibende", |g| g.overview.plant_trade_tax),
                per_group(groups, "Wind-/Solar-Euro", |g| g.overview.state_bonus),
                per_group(groups, "EEG", |g| g.overview.participation_levy),
                per_group(groups, "Pachteinnahmen", |g| g.overview.direct_lease),
                per_group(groups, "Komm. GewSt-Anteil", |g| g.overview.lease_trade_tax),
                per_group(groups, "Komm. EKSt-Anteil", |g| g.overview.lease_income_tax),
                per_group(groups, "Summe", |g| g.overview.total),
            ],
        },
    ];

    charts.extend(
        groups
            .values()
            .map(|g| trade_tax_chart(g.group, &g.trade_tax, timestamp)),
    );
    charts
}
