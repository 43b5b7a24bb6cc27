use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LevyConfig;
use crate::error::KommWertError;
use crate::types::{Megawatts, Money, Rate, TechnologyKind};
use crate::KommWertResult;

/// Annual Wind-/Solar-Euro payment to the municipality for one technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateBonusOutput {
    pub kind: TechnologyKind,
    pub annual_bonus: Money,
    /// `annual_bonus` over the whole horizon
    pub horizon_total: Money,
}

/// Wind-Euro: installed MW × rate × share of the plants covered.
pub fn wind_bonus(capacity_mw: Megawatts, bonus_per_mw: Money, share: Rate) -> Money {
    capacity_mw * bonus_per_mw * share
}

/// Solar-Euro: installed MW × rate.
pub fn solar_bonus(capacity_mw: Megawatts, bonus_per_mw: Money) -> Money {
    capacity_mw * bonus_per_mw
}

/// State bonus of one technology. `wind_bonus_share` only applies to wind.
pub fn state_bonus(
    kind: TechnologyKind,
    capacity_mw: Megawatts,
    wind_bonus_share: Rate,
    cfg: &LevyConfig,
) -> KommWertResult<StateBonusOutput> {
    if wind_bonus_share < Decimal::ZERO || wind_bonus_share > Decimal::ONE {
        return Err(KommWertError::InvalidInput {
            field: "wind_bonus_share".into(),
            reason: format!("Share must be between 0 and 1, got {wind_bonus_share}"),
        });
    }

    let annual_bonus = match kind {
        TechnologyKind::Wind => wind_bonus(capacity_mw, cfg.wind_bonus_per_mw, wind_bonus_share),
        _ => solar_bonus(capacity_mw, cfg.solar_bonus_per_mw),
    };

    Ok(StateBonusOutput {
        kind,
        annual_bonus,
        horizon_total: annual_bonus * Decimal::from(cfg.horizon_years),
    })
}

/// Bonus the operator pays each year, charged as an operating cost.
///
/// Capacity beyond the legacy approvals pays the per-MW rate; legacy
/// approvals pay a lump sum per block of `legacy_block_mw`.
pub fn operator_bonus_charge(
    capacity_mw: Megawatts,
    legacy_approved_mw: Megawatts,
    bonus_per_mw: Money,
    cfg: &LevyConfig,
) -> Money {
    let new_capacity = if legacy_approved_mw < capacity_mw {
        capacity_mw - legacy_approved_mw
    } else {
        Decimal::ZERO
    };
    new_capacity * bonus_per_mw + legacy_approved_mw / cfg.legacy_block_mw * cfg.legacy_bonus_per_block
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_wind_bonus_with_share() {
        let cfg = LevyConfig::default();
        let out = state_bonus(TechnologyKind::Wind, dec!(20), dec!(0.5), &cfg).unwrap();
        assert_eq!(out.annual_bonus, dec!(50000));
        assert_eq!(out.horizon_total, dec!(1250000));
    }

    #[test]
    fn test_solar_bonus_ignores_wind_share() {
        let cfg = LevyConfig::default();
        let out = state_bonus(TechnologyKind::GroundPv, dec!(10), dec!(0.5), &cfg).unwrap();
        assert_eq!(out.annual_bonus, dec!(20000));
    }

    #[test]
    fn test_invalid_share_rejected() {
        let cfg = LevyConfig::default();
        assert!(state_bonus(TechnologyKind::Wind, dec!(10), dec!(1.2), &cfg).is_err());
    }

    #[test]
    fn test_operator_charge_without_legacy() {
        let cfg = LevyConfig::default();
        assert_eq!(
            operator_bonus_charge(dec!(12), Decimal::ZERO, dec!(5000), &cfg),
            dec!(60000)
        );
    }

    #[test]
    fn test_operator_charge_with_legacy_blocks() {
        let cfg = LevyConfig::default();
        // 6 new MW at 5000 plus 6/6 blocks at 10000
        assert_eq!(
            operator_bonus_charge(dec!(12), dec!(6), dec!(5000), &cfg),
            dec!(40000)
        );
        // Legacy above capacity: only the lump sum
        assert_eq!(
            operator_bonus_charge(dec!(6), dec!(12), dec!(5000), &cfg),
            dec!(20000)
        );
    }
}
