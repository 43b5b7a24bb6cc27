use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::capacity::investment::investment_cost_per_mw;
use crate::config::CapacityConfig;
use crate::error::KommWertError;
use crate::types::{
    with_metadata, ComputationOutput, Hectares, Megawatts, Money, PerTechnology, TechnologyKind,
};
use crate::KommWertResult;

const SQUARE_METRES_PER_HECTARE: Decimal = dec!(10000);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Area and capacity as supplied by the caller. Zero means "not given".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuppliedCapacity {
    #[serde(default)]
    pub area_ha: Hectares,
    #[serde(default)]
    pub capacity_mw: Megawatts,
}

/// Capacities of all technologies plus the turbine the wind figures refer to.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeInput {
    #[serde(default)]
    pub technologies: PerTechnology<SuppliedCapacity>,
    pub rotor_diameter_m: Option<Decimal>,
    pub rated_unit_output_mw: Option<Megawatts>,
}

/// Turbine geometry used for the wind conversions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindGeometry {
    pub rotor_diameter_m: Decimal,
    pub rated_unit_output_mw: Megawatts,
    /// Footprint in m² per squared rotor diameter
    pub footprint_factor: Decimal,
}

impl WindGeometry {
    /// Geometry with the configured footprint factor, falling back to the
    /// configured turbine when the caller leaves a field unset or zero.
    pub fn from_config(
        rotor_diameter_m: Option<Decimal>,
        rated_unit_output_mw: Option<Megawatts>,
        cfg: &CapacityConfig,
    ) -> Self {
        WindGeometry {
            rotor_diameter_m: rotor_diameter_m
                .filter(|d| !d.is_zero())
                .unwrap_or(cfg.default_rotor_diameter_m),
            rated_unit_output_mw: rated_unit_output_mw
                .filter(|p| !p.is_zero())
                .unwrap_or(cfg.default_rated_unit_output_mw),
            footprint_factor: cfg.turbine_footprint_factor,
        }
    }

    /// Land claimed by one turbine, in m².
    pub fn footprint_m2(&self) -> Decimal {
        self.footprint_factor * self.rotor_diameter_m * self.rotor_diameter_m
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Which of the two quantities was filled in by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedQuantity {
    /// Both were supplied (or both were zero)
    None,
    Area,
    Capacity,
}

/// Reconciled area and capacity of one technology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCapacity {
    pub kind: TechnologyKind,
    pub area_ha: Hectares,
    pub capacity_mw: Megawatts,
    /// Whole turbines placed (wind only)
    pub turbine_count: Option<Decimal>,
    pub derived: DerivedQuantity,
    /// Investment cost per MW selected from the tier tables
    pub investment_cost_per_mw: Money,
}

impl NormalizedCapacity {
    pub fn is_configured(&self) -> bool {
        self.capacity_mw > Decimal::ZERO || self.area_ha > Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Number of whole turbines fitting on `area_ha` (rounded half-to-even).
pub fn turbines_on_area(area_ha: Hectares, geometry: &WindGeometry) -> KommWertResult<Decimal> {
    let footprint = geometry.footprint_m2();
    if footprint.is_zero() {
        return Err(KommWertError::DivisionByZero {
            context: "turbine footprint (rotor diameter is zero)".into(),
        });
    }
    Ok((area_ha * SQUARE_METRES_PER_HECTARE / footprint).round_dp(0))
}

/// Number of whole turbines needed for `capacity_mw` (rounded half-to-even).
pub fn turbines_for_capacity(
    capacity_mw: Megawatts,
    geometry: &WindGeometry,
) -> KommWertResult<Decimal> {
    if geometry.rated_unit_output_mw.is_zero() {
        return Err(KommWertError::DivisionByZero {
            context: "turbine count (rated unit output is zero)".into(),
        });
    }
    Ok((capacity_mw / geometry.rated_unit_output_mw).round_dp(0))
}

/// Fill in whichever of area and capacity the caller left at zero.
///
/// Capacity is derived from area first, then area from capacity, so a
/// technology given only by area ends up with both values and a technology
/// given only by capacity likewise. Conversion rules:
///
/// - wind: whole turbines on the footprint `factor · D²`
/// - ground-mounted PV: one MW per hectare
/// - agri-PV: the configured MW/ha ratio of the variant
pub fn normalize_technology(
    kind: TechnologyKind,
    supplied: &SuppliedCapacity,
    geometry: &WindGeometry,
    cfg: &CapacityConfig,
) -> KommWertResult<NormalizedCapacity> {
    if supplied.area_ha < Decimal::ZERO {
        return Err(KommWertError::InvalidInput {
            field: format!("{kind}.area_ha"),
            reason: "Area cannot be negative".into(),
        });
    }
    if supplied.capacity_mw < Decimal::ZERO {
        return Err(KommWertError::InvalidInput {
            field: format!("{kind}.capacity_mw"),
            reason: "Capacity cannot be negative".into(),
        });
    }

    let mut area = supplied.area_ha;
    let mut capacity = supplied.capacity_mw;
    let mut turbine_count = None;
    let mut derived = DerivedQuantity::None;

    if capacity.is_zero() && !area.is_zero() {
        capacity = match kind {
            TechnologyKind::Wind => {
                let n = turbines_on_area(area, geometry)?;
                turbine_count = Some(n);
                geometry.rated_unit_output_mw * n
            }
            TechnologyKind::GroundPv => area,
            TechnologyKind::AgriPvVertical => area * cfg.agri_pv_vertical_mw_per_ha,
            TechnologyKind::AgriPvHorizontal => area * cfg.agri_pv_horizontal_mw_per_ha,
        };
        derived = DerivedQuantity::Capacity;
    } else if area.is_zero() && !capacity.is_zero() {
        area = match kind {
            TechnologyKind::Wind => {
                let n = turbines_for_capacity(capacity, geometry)?;
                turbine_count = Some(n);
                geometry.footprint_m2() * n / SQUARE_METRES_PER_HECTARE
            }
            TechnologyKind::GroundPv => capacity,
            TechnologyKind::AgriPvVertical => capacity / cfg.agri_pv_vertical_mw_per_ha,
            TechnologyKind::AgriPvHorizontal => capacity / cfg.agri_pv_horizontal_mw_per_ha,
        };
        derived = DerivedQuantity::Area;
    }

    let investment_cost_per_mw = investment_cost_per_mw(
        kind,
        capacity,
        geometry.rated_unit_output_mw,
        &cfg.investment_tiers,
    );

    log::debug!(
        "normalized {kind}: area={area} ha, capacity={capacity} MW, derived={derived:?}"
    );

    Ok(NormalizedCapacity {
        kind,
        area_ha: area,
        capacity_mw: capacity,
        turbine_count,
        derived,
        investment_cost_per_mw,
    })
}

/// Normalize all four technologies.
pub fn normalize_all(
    supplied: &PerTechnology<SuppliedCapacity>,
    geometry: &WindGeometry,
    cfg: &CapacityConfig,
) -> KommWertResult<PerTechnology<NormalizedCapacity>> {
    PerTechnology::try_from_fn(|kind| {
        normalize_technology(kind, supplied.get(kind), geometry, cfg)
    })
}

/// [`normalize_all`] for a caller-supplied turbine, wrapped in the standard
/// output envelope.
pub fn normalize_capacities(
    input: &NormalizeInput,
    cfg: &CapacityConfig,
) -> KommWertResult<ComputationOutput<PerTechnology<NormalizedCapacity>>> {
    let start = Instant::now();
    let geometry = WindGeometry::from_config(input.rotor_diameter_m, input.rated_unit_output_mw, cfg);
    let normalized = normalize_all(&input.technologies, &geometry, cfg)?;

    let warnings = normalized
        .iter()
        .filter(|(_, n)| !n.is_configured())
        .map(|(kind, _)| format!("{kind}: neither area nor capacity given"))
        .collect();

    let assumptions = serde_json::json!({
        "rotor_diameter_m": geometry.rotor_diameter_m.to_string(),
        "rated_unit_output_mw": geometry.rated_unit_output_mw.to_string(),
        "turbine_footprint_m2": geometry.footprint_m2().round_dp(2).to_string(),
        "agri_pv_vertical_mw_per_ha": cfg.agri_pv_vertical_mw_per_ha.to_string(),
        "agri_pv_horizontal_mw_per_ha": cfg.agri_pv_horizontal_mw_per_ha.to_string(),
    });

    Ok(with_metadata(
        "Area and capacity reconciliation",
        &assumptions,
        warnings,
        start.elapsed().as_micros() as u64,
        normalized,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> WindGeometry {
        WindGeometry::from_config(None, None, &CapacityConfig::default())
    }

    fn supplied(area_ha: Decimal, capacity_mw: Decimal) -> SuppliedCapacity {
        SuppliedCapacity {
            area_ha,
            capacity_mw,
        }
    }

    fn normalize(kind: TechnologyKind, s: SuppliedCapacity) -> NormalizedCapacity {
        normalize_technology(kind, &s, &geometry(), &CapacityConfig::default()).unwrap()
    }

    #[test]
    fn test_round_trip_area_capacity_area() {
        let g = geometry();
        let five_turbines = g.footprint_m2() * dec!(5) / SQUARE_METRES_PER_HECTARE;
        let cases = [
            (TechnologyKind::Wind, five_turbines),
            (TechnologyKind::GroundPv, dec!(12.5)),
            (TechnologyKind::AgriPvVertical, dec!(10)),
            (TechnologyKind::AgriPvHorizontal, dec!(7)),
        ];
        for (kind, area) in cases {
            let forward = normalize(kind, supplied(area, Decimal::ZERO));
            assert_eq!(forward.derived, DerivedQuantity::Capacity);
            let back = normalize(kind, supplied(Decimal::ZERO, forward.capacity_mw));
            assert_eq!(back.derived, DerivedQuantity::Area);
            assert!(
                (back.area_ha - area).abs() < dec!(0.000001),
                "{kind}: {area} -> {} MW -> {}",
                forward.capacity_mw,
                back.area_ha
            );
        }
    }

    #[test]
    fn test_wind_from_area_counts_whole_turbines() {
        // Footprint at D = 130 m is 3π·16900 ≈ 159 279 m², i.e. ≈ 15.93 ha
        let n = normalize(TechnologyKind::Wind, supplied(dec!(100), Decimal::ZERO));
        assert_eq!(n.turbine_count, Some(dec!(6)));
        assert_eq!(n.capacity_mw, dec!(24));
        assert_eq!(n.area_ha, dec!(100));
    }

    #[test]
    fn test_wind_from_capacity() {
        let n = normalize(TechnologyKind::Wind, supplied(Decimal::ZERO, dec!(10)));
        // 10 / 4 = 2.5 rounds half-to-even to 2
        assert_eq!(n.turbine_count, Some(dec!(2)));
        let expected = geometry().footprint_m2() * dec!(2) / SQUARE_METRES_PER_HECTARE;
        assert_eq!(n.area_ha, expected);
        assert_eq!(n.capacity_mw, dec!(10));
    }

    #[test]
    fn test_footprint_factor_is_configurable() {
        let mut cfg = CapacityConfig::default();
        cfg.turbine_footprint_factor = dec!(5);
        let g = WindGeometry::from_config(Some(dec!(100)), Some(dec!(5)), &cfg);
        // 5 · 100² = 50 000 m² = 5 ha per turbine
        assert_eq!(g.footprint_m2(), dec!(50000));
        let n = normalize_technology(
            TechnologyKind::Wind,
            &supplied(dec!(20), Decimal::ZERO),
            &g,
            &cfg,
        )
        .unwrap();
        assert_eq!(n.turbine_count, Some(dec!(4)));
        assert_eq!(n.capacity_mw, dec!(20));
    }

    #[test]
    fn test_both_supplied_are_kept() {
        let n = normalize(TechnologyKind::AgriPvVertical, supplied(dec!(10), dec!(5)));
        assert_eq!(n.derived, DerivedQuantity::None);
        assert_eq!(n.area_ha, dec!(10));
        assert_eq!(n.capacity_mw, dec!(5));
    }

    #[test]
    fn test_both_zero_means_not_configured() {
        let n = normalize(TechnologyKind::GroundPv, SuppliedCapacity::default());
        assert!(!n.is_configured());
        assert_eq!(n.derived, DerivedQuantity::None);
    }

    #[test]
    fn test_investment_cost_follows_normalized_capacity() {
        let n = normalize(TechnologyKind::GroundPv, supplied(dec!(1), Decimal::ZERO));
        assert_eq!(n.investment_cost_per_mw, dec!(840000));
        let n = normalize(TechnologyKind::AgriPvHorizontal, supplied(dec!(100), Decimal::ZERO));
        assert_eq!(n.capacity_mw, dec!(65));
        assert_eq!(n.investment_cost_per_mw, dec!(945000));
    }

    #[test]
    fn test_zero_rotor_diameter_is_division_by_zero() {
        let mut g = geometry();
        g.rotor_diameter_m = Decimal::ZERO;
        let err = normalize_technology(
            TechnologyKind::Wind,
            &supplied(dec!(10), Decimal::ZERO),
            &g,
            &CapacityConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, KommWertError::DivisionByZero { .. }));
    }

    #[test]
    fn test_negative_area_rejected() {
        let err = normalize_technology(
            TechnologyKind::GroundPv,
            &supplied(dec!(-1), Decimal::ZERO),
            &geometry(),
            &CapacityConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, KommWertError::InvalidInput { .. }));
    }

    #[test]
    fn test_normalize_capacities_envelope() {
        let input: NormalizeInput = serde_json::from_str(
            r#"{
                "technologies": {
                    "wind": { "area_ha": "100" },
                    "ground_pv": { "capacity_mw": "12" },
                    "agri_pv_vertical": {},
                    "agri_pv_horizontal": { "area_ha": "10" }
                }
            }"#,
        )
        .unwrap();
        let out = normalize_capacities(&input, &CapacityConfig::default()).unwrap();
        assert_eq!(out.result.wind.capacity_mw, dec!(24));
        assert_eq!(out.result.ground_pv.area_ha, dec!(12));
        assert_eq!(out.result.agri_pv_horizontal.capacity_mw, dec!(6.5));
        assert_eq!(out.warnings.len(), 1);
    }
}
