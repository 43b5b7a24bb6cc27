use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::simulation::profit::SimulationOutput;
use crate::types::{Money, TechnologyKind, YearValue};

// ---------------------------------------------------------------------------
// Reporting groups
// ---------------------------------------------------------------------------

/// The three categories municipal revenue is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportingGroup {
    Wind,
    GroundPv,
    AgriPv,
}

impl ReportingGroup {
    pub const ALL: [ReportingGroup; 3] = [
        ReportingGroup::Wind,
        ReportingGroup::GroundPv,
        ReportingGroup::AgriPv,
    ];

    pub fn members(self) -> &'static [TechnologyKind] {
        match self {
            ReportingGroup::Wind => &[TechnologyKind::Wind],
            ReportingGroup::GroundPv => &[TechnologyKind::GroundPv],
            ReportingGroup::AgriPv => &[
                TechnologyKind::AgriPvVertical,
                TechnologyKind::AgriPvHorizontal,
            ],
        }
    }

    pub fn of(kind: TechnologyKind) -> ReportingGroup {
        match kind {
            TechnologyKind::Wind => ReportingGroup::Wind,
            TechnologyKind::GroundPv => ReportingGroup::GroundPv,
            TechnologyKind::AgriPvVertical | TechnologyKind::AgriPvHorizontal => {
                ReportingGroup::AgriPv
            }
        }
    }

    /// Label used on charts.
    pub fn label(self) -> &'static str {
        match self {
            ReportingGroup::Wind => "WEA-MAX",
            ReportingGroup::GroundPv => "FFPV-MAX",
            ReportingGroup::AgriPv => "APV-MAX",
        }
    }

    /// Artifact stem of the yearly trade-tax chart.
    pub fn trade_tax_artifact(self) -> &'static str {
        match self {
            ReportingGroup::Wind => "gewerbesteuer-wind",
            ReportingGroup::GroundPv => "gewerbesteuer-ff-pv",
            ReportingGroup::AgriPv => "gewerbesteuer-agri-pv",
        }
    }
}

impl fmt::Display for ReportingGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportingGroup::Wind => "wind",
            ReportingGroup::GroundPv => "ground_pv",
            ReportingGroup::AgriPv => "agri_pv",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Plant trade tax per group
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTradeTax {
    /// Per-year sum over the group's scenarios, negatives included
    pub yearly: Vec<YearValue>,
    /// Sum of every positive yearly value of every scenario in the group
    pub total: Money,
    /// Largest entry of `yearly`
    pub max_single_year: Money,
}

/// Fold the municipal trade-tax series of a group's scenarios.
///
/// Scenarios missing from `results` contribute nothing.
pub fn group_trade_tax(
    group: ReportingGroup,
    results: &BTreeMap<TechnologyKind, SimulationOutput>,
    horizon_years: u32,
) -> GroupTradeTax {
    let mut yearly: Vec<YearValue> = (1..=horizon_years)
        .map(|year| YearValue {
            year,
            value: Decimal::ZERO,
        })
        .collect();
    let mut total = Decimal::ZERO;

    for kind in group.members() {
        let Some(output) = results.get(kind) else {
            continue;
        };
        for (slot, y) in yearly.iter_mut().zip(&output.years) {
            slot.value += y.trade_tax_municipal;
            if y.trade_tax_municipal > Decimal::ZERO {
                total += y.trade_tax_municipal;
            }
        }
    }

    let max_single_year = yearly
        .iter()
        .map(|y| y.value)
        .max()
        .unwrap_or(Decimal::ZERO);

    GroupTradeTax {
        yearly,
        total,
        max_single_year,
    }
}

// ---------------------------------------------------------------------------
// Horizon overview
// ---------------------------------------------------------------------------

/// All municipal income of one group over the horizon. Lease channels are
/// the yearly amounts; components keep their sign and `total` is their
/// signed sum.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueOverview {
    pub plant_trade_tax: Money,
    pub state_bonus: Money,
    pub participation_levy: Money,
    pub direct_lease: Money,
    pub lease_trade_tax: Money,
    pub lease_income_tax: Money,
    pub total: Money,
}

impl RevenueOverview {
    pub fn new(
        plant_trade_tax: Money,
        state_bonus: Money,
        participation_levy: Money,
        direct_lease: Money,
        lease_trade_tax: Money,
        lease_income_tax: Money,
    ) -> Self {
        RevenueOverview {
            plant_trade_tax,
            state_bonus,
            participation_levy,
            direct_lease,
            lease_trade_tax,
            lease_income_tax,
            total: plant_trade_tax
                + state_bonus
                + participation_levy
                + direct_lease
                + lease_trade_tax
                + lease_income_tax,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// Numbers behind one chart. Rendering is left to the caller, which should
/// write the chart to `artifact` (stem plus run timestamp, no extension).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub artifact: String,
    pub title: String,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub values: Vec<Money>,
}

pub fn artifact_name(stem: &str, timestamp: i64) -> String {
    format!("{stem}_{timestamp}")
}

/// Yearly trade-tax chart of one group, clamped at zero.
pub fn trade_tax_chart(group: ReportingGroup, trade_tax: &GroupTradeTax, timestamp: i64) -> ChartData {
    ChartData {
        artifact: artifact_name(group.trade_tax_artifact(), timestamp),
        title: format!("Gewerbesteuereinnahmen {}", group.label()),
        series: vec![ChartSeries {
            label: group.label().to_string(),
            values: trade_tax
                .yearly
                .iter()
                .map(|y| y.value.max(Decimal::ZERO))
                .collect(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::profit::YearlyResult;
    use rust_decimal_macros::dec;

    fn output(taxes: &[Decimal]) -> SimulationOutput {
        let years = taxes
            .iter()
            .enumerate()
            .map(|(i, t)| YearlyResult {
                year: i as u32 + 1,
                revenue: Decimal::ZERO,
                operating_cost: Decimal::ZERO,
                interest: Decimal::ZERO,
                amortization: Decimal::ZERO,
                outstanding_principal: Decimal::ZERO,
                levy: Decimal::ZERO,
                depreciation: Decimal::ZERO,
                profit: Decimal::ZERO,
                loss_carryforward: Decimal::ZERO,
                taxable_profit: Decimal::ZERO,
                trade_tax_total: *t,
                trade_tax_municipal: *t,
            })
            .collect();
        SimulationOutput {
            name: String::new(),
            years,
            break_even_year: None,
            cumulative_profit: Decimal::ZERO,
            cumulative_taxable_profit: Decimal::ZERO,
            total_municipal_trade_tax: taxes.iter().sum(),
            final_loss_carryforward: Decimal::ZERO,
        }
    }

    #[test]
    fn test_members_cover_every_technology_once() {
        let mut seen: Vec<TechnologyKind> = ReportingGroup::ALL
            .iter()
            .flat_map(|g| g.members().iter().copied())
            .collect();
        seen.sort();
        assert_eq!(seen, TechnologyKind::ALL.to_vec());
        for kind in TechnologyKind::ALL {
            assert!(ReportingGroup::of(kind).members().contains(&kind));
        }
    }

    #[test]
    fn test_agri_group_sums_both_variants() {
        let mut results = BTreeMap::new();
        results.insert(
            TechnologyKind::AgriPvVertical,
            output(&[dec!(10), dec!(-30), dec!(20)]),
        );
        results.insert(
            TechnologyKind::AgriPvHorizontal,
            output(&[dec!(5), dec!(15), dec!(40)]),
        );
        // Unrelated scenario must not leak in
        results.insert(TechnologyKind::Wind, output(&[dec!(1000); 3]));

        let g = group_trade_tax(ReportingGroup::AgriPv, &results, 3);
        let yearly: Vec<Decimal> = g.yearly.iter().map(|y| y.value).collect();
        assert_eq!(yearly, vec![dec!(15), dec!(-15), dec!(60)]);
        // Positive values per scenario: 10 + 20 + 5 + 15 + 40
        assert_eq!(g.total, dec!(90));
        assert_eq!(g.max_single_year, dec!(60));
    }

    #[test]
    fn test_missing_scenario_contributes_nothing() {
        let g = group_trade_tax(ReportingGroup::Wind, &BTreeMap::new(), 25);
        assert_eq!(g.yearly.len(), 25);
        assert_eq!(g.total, Decimal::ZERO);
        assert_eq!(g.max_single_year, Decimal::ZERO);
    }

    #[test]
    fn test_overview_keeps_negative_lease_trade_tax() {
        let o = RevenueOverview::new(
            dec!(100),
            dec!(50),
            dec!(25),
            Decimal::ZERO,
            dec!(-10),
            dec!(5),
        );
        assert_eq!(o.lease_trade_tax, dec!(-10));
        assert_eq!(o.total, dec!(170));
    }

    #[test]
    fn test_trade_tax_chart_clamps_and_tags() {
        let mut results = BTreeMap::new();
        results.insert(TechnologyKind::Wind, output(&[dec!(-5), dec!(7)]));
        let g = group_trade_tax(ReportingGroup::Wind, &results, 2);
        let chart = trade_tax_chart(ReportingGroup::Wind, &g, 1700000000);
        assert_eq!(chart.artifact, "gewerbesteuer-wind_1700000000");
        assert_eq!(chart.series[0].values, vec![Decimal::ZERO, dec!(7)]);
    }
}
