use rust_decimal::Decimal;

use crate::config::{CostTier, InvestmentCostTiers};
use crate::types::{Megawatts, Money, TechnologyKind};

/// Investment cost per installed MW.
///
/// Wind is priced by the rated output of a single turbine (larger turbines are
/// cheaper per MW); the solar family by the total capacity of the park, with
/// the agri-PV variants carrying a mark-up over ground-mounted PV.
pub fn investment_cost_per_mw(
    kind: TechnologyKind,
    capacity_mw: Megawatts,
    rated_unit_output_mw: Megawatts,
    tiers: &InvestmentCostTiers,
) -> Money {
    match kind {
        TechnologyKind::Wind => lookup(&tiers.wind, rated_unit_output_mw, tiers.wind_otherwise),
        TechnologyKind::GroundPv => solar_cost_per_mw(capacity_mw, tiers),
        TechnologyKind::AgriPvVertical => {
            solar_cost_per_mw(capacity_mw, tiers) * tiers.agri_pv_vertical_markup
        }
        TechnologyKind::AgriPvHorizontal => {
            solar_cost_per_mw(capacity_mw, tiers) * tiers.agri_pv_horizontal_markup
        }
    }
}

fn solar_cost_per_mw(capacity_mw: Megawatts, tiers: &InvestmentCostTiers) -> Money {
    if capacity_mw == Decimal::ONE {
        return tiers.solar_exactly_one_mw;
    }
    lookup(&tiers.solar, capacity_mw, tiers.solar_otherwise)
}

fn lookup(tiers: &[CostTier], key: Decimal, otherwise: Money) -> Money {
    tiers
        .iter()
        .find(|t| key < t.below)
        .map(|t| t.cost_per_mw)
        .unwrap_or(otherwise)
}
