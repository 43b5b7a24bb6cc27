use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LevyConfig;
use crate::error::KommWertError;
use crate::profile::OutputProfile;
use crate::types::{Megawatts, Money, Rate, TechnologyKind, YearValue};
use crate::KommWertResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A yearly amount decaying with plant degradation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedSeries {
    pub yearly: Vec<YearValue>,
    pub total: Money,
}

/// EEG participation payments of one technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationLevyOutput {
    pub kind: TechnologyKind,
    /// First-year payment before degradation
    pub annual_levy: Money,
    /// Fraction of the plants whose operators pay the levy
    pub participation_share: Rate,
    pub degradation_rate: Rate,
    pub degraded: DegradedSeries,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Levy for one year of generation: Σ profile·capacity·rate over all periods.
pub fn annual_levy(profile: &OutputProfile, capacity_mw: Megawatts, levy_per_mwh: Money) -> Money {
    profile
        .values
        .iter()
        .map(|p| *p * capacity_mw * levy_per_mwh)
        .sum()
}

/// `base · (1 − rate)^year` for every year in `1..=years`, and the sum.
///
/// Year 1 is already degraded by one step.
pub fn degraded_series(base: Money, rate: Rate, years: u32) -> DegradedSeries {
    let base_factor = Decimal::ONE - rate;
    let mut factor = Decimal::ONE;
    let mut yearly = Vec::with_capacity(years as usize);
    let mut total = Decimal::ZERO;

    for year in 1..=years {
        factor *= base_factor;
        let value = base * factor;
        total += value;
        yearly.push(YearValue { year, value });
    }

    DegradedSeries { yearly, total }
}

/// Participation levy of one technology over the configured horizon.
///
/// `participation_share` scales the result (only the wind share is
/// configurable; pass `Decimal::ONE` for the solar family). A technology with
/// installed capacity needs a generation profile.
pub fn participation_levy(
    kind: TechnologyKind,
    profile: Option<&OutputProfile>,
    capacity_mw: Megawatts,
    participation_share: Rate,
    cfg: &LevyConfig,
) -> KommWertResult<ParticipationLevyOutput> {
    if participation_share < Decimal::ZERO || participation_share > Decimal::ONE {
        return Err(KommWertError::InvalidInput {
            field: format!("{kind}.participation_share"),
            reason: format!("Share must be between 0 and 1, got {participation_share}"),
        });
    }

    let base = match profile {
        Some(p) => {
            p.validate(&format!("{kind}.profile"))?;
            annual_levy(p, capacity_mw, cfg.participation_levy_per_mwh) * participation_share
        }
        None if capacity_mw.is_zero() => Decimal::ZERO,
        None => {
            return Err(KommWertError::MissingInput {
                field: format!("{kind}.profile"),
            })
        }
    };

    let degradation_rate = cfg.degradation(kind);
    let degraded = degraded_series(base, degradation_rate, cfg.horizon_years);

    Ok(ParticipationLevyOutput {
        kind,
        annual_levy: base,
        participation_share,
        degradation_rate,
        degraded,
    })
}
