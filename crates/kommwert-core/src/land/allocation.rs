use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crate::config::{LeaseConfig, TaxConfig};
use crate::land::ownership::{OwnerType, OwnershipShare};
use crate::tax::income_tax::income_tax_delta;
use crate::tax::trade_tax::{trade_tax, FEDERAL_STATE_OFFSET};
use crate::types::{Hectares, Megawatts, Money, Rate, TechnologyKind};
use crate::KommWertResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Tax context in which lease payments are assessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationParams {
    pub reference_commercial_income: Money,
    pub trade_tax_allowance: Money,
    pub trade_tax_base_rate: Rate,
    pub municipal_multiplier: Decimal,
    pub reference_private_income: Money,
    pub municipal_income_tax_share: Rate,
    pub local_surcharge: Decimal,
}

impl AllocationParams {
    pub fn new(tax: &TaxConfig, municipal_multiplier: Decimal, local_surcharge: Decimal) -> Self {
        AllocationParams {
            reference_commercial_income: tax.reference_commercial_income,
            trade_tax_allowance: tax.trade_tax_allowance,
            trade_tax_base_rate: tax.trade_tax_base_rate,
            municipal_multiplier,
            reference_private_income: tax.reference_private_income,
            municipal_income_tax_share: tax.municipal_income_tax_share,
            local_surcharge,
        }
    }
}

/// Annual municipal revenue caused by land leases, split by channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MunicipalRevenueComponents {
    /// Lease paid directly to the municipality as landowner
    pub direct_lease_income: Money,
    /// Additional municipal trade tax from commercial landowners
    pub trade_tax_share: Money,
    /// Additional municipal income-tax share from private landowners
    pub income_tax_share: Money,
}

impl MunicipalRevenueComponents {
    pub fn total(&self) -> Money {
        self.direct_lease_income + self.trade_tax_share + self.income_tax_share
    }
}

impl Add for MunicipalRevenueComponents {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        MunicipalRevenueComponents {
            direct_lease_income: self.direct_lease_income + rhs.direct_lease_income,
            trade_tax_share: self.trade_tax_share + rhs.trade_tax_share,
            income_tax_share: self.income_tax_share + rhs.income_tax_share,
        }
    }
}

impl AddAssign for MunicipalRevenueComponents {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Total annual lease of a technology if its whole area were leased.
///
/// Solar leases are priced per hectare; wind leases per installed MW.
pub fn annual_lease(
    kind: TechnologyKind,
    area_ha: Hectares,
    capacity_mw: Megawatts,
    lease: &LeaseConfig,
) -> Money {
    match kind {
        TechnologyKind::Wind => capacity_mw * lease.wind_per_mw,
        TechnologyKind::GroundPv => area_ha * lease.ground_pv_per_ha,
        TechnologyKind::AgriPvVertical | TechnologyKind::AgriPvHorizontal => {
            area_ha * lease.agri_pv_per_ha
        }
    }
}

/// Municipal revenue from the part of the lease held by one owner.
pub fn allocate_share(
    total_lease: Money,
    share: &OwnershipShare,
    params: &AllocationParams,
) -> KommWertResult<MunicipalRevenueComponents> {
    let lease = total_lease * share.fraction();

    let components = match share.owner_type {
        OwnerType::CommercialProperty => MunicipalRevenueComponents {
            trade_tax_share: commercial_trade_tax_delta(lease, params),
            ..Default::default()
        },
        OwnerType::PrivateProperty => {
            let delta = income_tax_delta(params.reference_private_income, lease)?;
            MunicipalRevenueComponents {
                income_tax_share: delta
                    * params.municipal_income_tax_share
                    * params.local_surcharge,
                ..Default::default()
            }
        }
        OwnerType::MunicipalProperty => MunicipalRevenueComponents {
            direct_lease_income: lease,
            ..Default::default()
        },
        OwnerType::Other(_) => MunicipalRevenueComponents::default(),
    };

    Ok(components)
}

/// Additional municipal trade tax when `lease` is added to the reference
/// commercial profit, net of the federal/state offset. Both terms are
/// truncated to whole euros.
fn commercial_trade_tax_delta(lease: Money, params: &AllocationParams) -> Money {
    let with_lease = trade_tax(
        params.reference_commercial_income + lease,
        params.trade_tax_allowance,
        params.trade_tax_base_rate,
        params.municipal_multiplier,
    );
    let without = trade_tax(
        params.reference_commercial_income,
        params.trade_tax_allowance,
        params.trade_tax_base_rate,
        params.municipal_multiplier,
    );
    let delta = (with_lease.total - without.total).trunc();

    // The offset is scaled by 1 / multiplier here, not by the multiplier.
    let offset = if params.municipal_multiplier.is_zero() {
        Decimal::ZERO
    } else {
        (lease * params.trade_tax_base_rate / params.municipal_multiplier * FEDERAL_STATE_OFFSET)
            .trunc()
    };

    delta - offset
}

/// Sum the contributions of every owner of one technology's area.
pub fn allocate_technology(
    total_lease: Money,
    shares: &[OwnershipShare],
    params: &AllocationParams,
) -> KommWertResult<MunicipalRevenueComponents> {
    shares
        .iter()
        .try_fold(MunicipalRevenueComponents::default(), |acc, share| {
            Ok(acc + allocate_share(total_lease, share, params)?)
        })
}
