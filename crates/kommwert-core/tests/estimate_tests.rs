#![cfg(feature = "revenue")]

use kommwert_core::capacity::normalizer::{
    normalize_technology, DerivedQuantity, SuppliedCapacity, WindGeometry,
};
use kommwert_core::config::{CapacityConfig, ModelConfig};
use kommwert_core::land::allocation::{allocate_technology, annual_lease, AllocationParams};
use kommwert_core::land::ownership::{OwnerType, OwnershipShare};
use kommwert_core::profile::OutputProfile;
use kommwert_core::revenue::estimate::{estimate_at, EstimateInput, TechnologyInput};
use kommwert_core::revenue::groups::ReportingGroup;
use kommwert_core::revenue::scenarios::scenario_input;
use kommwert_core::simulation::profit::simulate_scenario;
use kommwert_core::TechnologyKind;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn hourly(value: Decimal) -> OutputProfile {
    OutputProfile::from(vec![value; 8760])
}

// ===========================================================================
// Capacity normalizer
// ===========================================================================

#[test]
fn test_solar_family_round_trip() {
    let cfg = CapacityConfig::default();
    let geometry = WindGeometry::from_config(None, None, &cfg);
    for kind in [
        TechnologyKind::GroundPv,
        TechnologyKind::AgriPvVertical,
        TechnologyKind::AgriPvHorizontal,
    ] {
        let from_area = normalize_technology(
            kind,
            &SuppliedCapacity {
                area_ha: dec!(40),
                capacity_mw: Decimal::ZERO,
            },
            &geometry,
            &cfg,
        )
        .unwrap();
        assert_eq!(from_area.derived, DerivedQuantity::Capacity);

        let back = normalize_technology(
            kind,
            &SuppliedCapacity {
                area_ha: Decimal::ZERO,
                capacity_mw: from_area.capacity_mw,
            },
            &geometry,
            &cfg,
        )
        .unwrap();
        assert_eq!(back.derived, DerivedQuantity::Area);
        assert!((back.area_ha - dec!(40)).abs() < dec!(0.000001), "{kind}");
    }
}

#[test]
fn test_wind_round_trip_on_whole_turbines() {
    let cfg = CapacityConfig::default();
    let geometry = WindGeometry::from_config(None, None, &cfg);
    let supplied = SuppliedCapacity {
        area_ha: Decimal::ZERO,
        capacity_mw: dec!(24),
    };
    let area = normalize_technology(TechnologyKind::Wind, &supplied, &geometry, &cfg).unwrap();
    assert_eq!(area.turbine_count, Some(dec!(6)));

    let back = normalize_technology(
        TechnologyKind::Wind,
        &SuppliedCapacity {
            area_ha: area.area_ha,
            capacity_mw: Decimal::ZERO,
        },
        &geometry,
        &cfg,
    )
    .unwrap();
    assert_eq!(back.capacity_mw, dec!(24));
}

// ===========================================================================
// Area revenue allocator
// ===========================================================================

#[test]
fn test_commercial_quarters_stay_out_of_direct_lease() {
    let config = ModelConfig::default();
    let lease = annual_lease(TechnologyKind::GroundPv, dec!(100), dec!(100), &config.lease);
    assert_eq!(lease, dec!(300000));

    let shares = vec![OwnershipShare::new(OwnerType::CommercialProperty, dec!(25)); 4];
    let params = AllocationParams::new(&config.tax, dec!(3.34), dec!(0.3));
    let result = allocate_technology(lease, &shares, &params).unwrap();
    assert_eq!(result.direct_lease_income, Decimal::ZERO);
    assert_eq!(result.income_tax_share, Decimal::ZERO);
    assert!(result.trade_tax_share > Decimal::ZERO);
}

// ===========================================================================
// Wind scenario end to end
// ===========================================================================

#[test]
fn test_wind_10mw_principal_repaid_by_term() {
    let config = ModelConfig::default();
    let geometry = WindGeometry::from_config(None, None, &config.capacity);
    let capacity = normalize_technology(
        TechnologyKind::Wind,
        &SuppliedCapacity {
            area_ha: Decimal::ZERO,
            capacity_mw: dec!(10),
        },
        &geometry,
        &config.capacity,
    )
    .unwrap();
    let profile = hourly(dec!(0.25));
    let input = scenario_input(
        config.scenarios.get(TechnologyKind::Wind),
        &capacity,
        Some(&profile),
        dec!(3.34),
        &config,
    )
    .unwrap();
    assert_eq!(input.investment, dec!(16_760_000));

    let out = simulate_scenario(&input).unwrap();
    let mut previous = input.investment * input.debt_share;
    for y in &out.years {
        assert!(y.outstanding_principal <= previous, "year {}", y.year);
        assert!(y.outstanding_principal >= Decimal::ZERO);
        previous = y.outstanding_principal;
    }
    // Two grace years plus thirteen amortizing years
    assert_eq!(out.years[14].outstanding_principal, Decimal::ZERO);
    assert!(out.years[13].outstanding_principal > Decimal::ZERO);
}

// ===========================================================================
// Full estimate
// ===========================================================================

fn mixed_input() -> EstimateInput {
    EstimateInput {
        technologies: kommwert_core::PerTechnology {
            wind: TechnologyInput {
                area_ha: Decimal::ZERO,
                capacity_mw: dec!(20),
                ownership: vec![
                    OwnershipShare::new(OwnerType::PrivateProperty, dec!(50)),
                    OwnershipShare::new(OwnerType::MunicipalProperty, dec!(50)),
                ],
                profile: Some(hourly(dec!(0.25))),
            },
            ground_pv: TechnologyInput {
                area_ha: dec!(50),
                capacity_mw: Decimal::ZERO,
                ownership: vec![OwnershipShare::new(OwnerType::CommercialProperty, dec!(100))],
                profile: Some(hourly(dec!(0.11))),
            },
            agri_pv_vertical: TechnologyInput {
                area_ha: dec!(20),
                capacity_mw: Decimal::ZERO,
                ownership: vec![OwnershipShare::new(OwnerType::MunicipalProperty, dec!(100))],
                profile: Some(hourly(dec!(0.1))),
            },
            agri_pv_horizontal: TechnologyInput {
                area_ha: dec!(20),
                capacity_mw: Decimal::ZERO,
                ownership: Vec::new(),
                profile: Some(hourly(dec!(0.1))),
            },
        },
        rotor_diameter_m: None,
        rated_unit_output_mw: None,
        wind_participation_share: Some(dec!(0.5)),
        wind_bonus_share: None,
        municipal_multiplier_percent: Some(dec!(350)),
        local_surcharge_rate: Some(dec!(0.003)),
    }
}

#[test]
fn test_full_estimate_groups() {
    let out = estimate_at(&mixed_input(), &ModelConfig::default(), 1_700_000_000).unwrap();
    let r = &out.result;

    assert_eq!(r.municipal_multiplier, dec!(3.5));
    assert_eq!(r.scenarios.len(), 4);
    assert_eq!(r.groups.len(), 3);

    // Wind levy is halved by the participation share; 2190 h × 20 MW × 2
    assert_eq!(
        r.technologies.wind.participation_levy.annual_levy,
        dec!(43800)
    );
    // 20 MW × 16000 × 50% municipal
    assert_eq!(
        r.technologies.wind.lease_revenue.direct_lease_income,
        dec!(160000)
    );

    let agri = &r.groups[&ReportingGroup::AgriPv];
    // Solar-Euro on 7 MW vertical + 13 MW horizontal
    assert_eq!(agri.annual_state_bonus, dec!(40000));
    // Only the vertical variant is municipal land
    assert_eq!(agri.lease_revenue.direct_lease_income, dec!(16600));

    for g in r.groups.values() {
        assert!(g.trade_tax.max_single_year <= g.trade_tax.total);
        assert_eq!(g.trade_tax.yearly.len(), 25);
        assert!(g.overview.total >= g.overview.plant_trade_tax);
    }
}

#[test]
fn test_estimate_input_with_form_labels() {
    let json = r#"{
        "technologies": {
            "wind": { "capacity_mw": "0" },
            "ground_pv": {
                "area_ha": "10",
                "ownership": [
                    { "ownertype": "Gemeindeeigentum", "flaechenanteil": "60" },
                    { "ownertype": "Privateigentum", "flaechenanteil": "40" }
                ],
                "profile": ["0.5", "0.5"]
            },
            "agri_pv_vertical": {},
            "agri_pv_horizontal": {}
        },
        "municipal_multiplier_percent": "0",
        "wind_bonus_share": "0"
    }"#;
    let input: EstimateInput = serde_json::from_str(json).unwrap();
    let out = estimate_at(&input, &ModelConfig::default(), 0).unwrap();
    let pv = &out.result.technologies.ground_pv;
    assert_eq!(pv.lease_revenue.direct_lease_income, dec!(18000));
    assert!(pv.lease_revenue.income_tax_share > Decimal::ZERO);
    assert_eq!(out.result.municipal_multiplier, dec!(3.34));
}

#[test]
fn test_partial_config_changes_lease_rate() {
    let config: ModelConfig =
        serde_json::from_str(r#"{ "lease": { "ground_pv_per_ha": "4000" } }"#).unwrap();
    let out = estimate_at(&mixed_input(), &config, 0).unwrap();
    assert_eq!(out.result.technologies.ground_pv.annual_lease, dec!(200000));
    // Everything else keeps its default
    assert_eq!(out.result.technologies.wind.annual_lease, dec!(320000));
}
