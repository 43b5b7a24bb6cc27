use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values (EUR). Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Installed nameplate capacity in MW
pub type Megawatts = Decimal;

/// Land area in hectares
pub type Hectares = Decimal;

/// Number of simulated years in every scenario.
pub const DEFAULT_HORIZON_YEARS: u32 = 25;

/// The four renewable technologies the model covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TechnologyKind {
    Wind,
    GroundPv,
    AgriPvVertical,
    AgriPvHorizontal,
}

impl TechnologyKind {
    pub const ALL: [TechnologyKind; 4] = [
        TechnologyKind::Wind,
        TechnologyKind::GroundPv,
        TechnologyKind::AgriPvVertical,
        TechnologyKind::AgriPvHorizontal,
    ];

    /// Wind degrades at a different rate and is leased per MW rather than per hectare.
    pub fn is_solar(self) -> bool {
        !matches!(self, TechnologyKind::Wind)
    }

    pub fn is_agri_pv(self) -> bool {
        matches!(
            self,
            TechnologyKind::AgriPvVertical | TechnologyKind::AgriPvHorizontal
        )
    }
}

impl fmt::Display for TechnologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TechnologyKind::Wind => "wind",
            TechnologyKind::GroundPv => "ground_pv",
            TechnologyKind::AgriPvVertical => "agri_pv_vertical",
            TechnologyKind::AgriPvHorizontal => "agri_pv_horizontal",
        };
        f.write_str(label)
    }
}

/// A value per technology. Used for inputs and outputs alike so that the
/// technology set is fixed at compile time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerTechnology<T> {
    pub wind: T,
    pub ground_pv: T,
    pub agri_pv_vertical: T,
    pub agri_pv_horizontal: T,
}

impl<T> PerTechnology<T> {
    pub fn get(&self, kind: TechnologyKind) -> &T {
        match kind {
            TechnologyKind::Wind => &self.wind,
            TechnologyKind::GroundPv => &self.ground_pv,
            TechnologyKind::AgriPvVertical => &self.agri_pv_vertical,
            TechnologyKind::AgriPvHorizontal => &self.agri_pv_horizontal,
        }
    }

    pub fn get_mut(&mut self, kind: TechnologyKind) -> &mut T {
        match kind {
            TechnologyKind::Wind => &mut self.wind,
            TechnologyKind::GroundPv => &mut self.ground_pv,
            TechnologyKind::AgriPvVertical => &mut self.agri_pv_vertical,
            TechnologyKind::AgriPvHorizontal => &mut self.agri_pv_horizontal,
        }
    }

    pub fn from_fn(mut f: impl FnMut(TechnologyKind) -> T) -> Self {
        PerTechnology {
            wind: f(TechnologyKind::Wind),
            ground_pv: f(TechnologyKind::GroundPv),
            agri_pv_vertical: f(TechnologyKind::AgriPvVertical),
            agri_pv_horizontal: f(TechnologyKind::AgriPvHorizontal),
        }
    }

    /// Build a value for every technology, failing on the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(TechnologyKind) -> Result<T, E>) -> Result<Self, E> {
        Ok(PerTechnology {
            wind: f(TechnologyKind::Wind)?,
            ground_pv: f(TechnologyKind::GroundPv)?,
            agri_pv_vertical: f(TechnologyKind::AgriPvVertical)?,
            agri_pv_horizontal: f(TechnologyKind::AgriPvHorizontal)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (TechnologyKind, &T)> {
        TechnologyKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }
}

/// A value for one simulated year (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: u32,
    pub value: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
    pub generated_at: DateTime<Utc>,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        log::warn!("{methodology}: {w}");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
            generated_at: Utc::now(),
        },
    }
}

/// Compute `(1 - rate)^years` by iterative multiplication.
pub fn decay_factor(rate: Rate, years: u32) -> Decimal {
    let base = Decimal::ONE - rate;
    let mut factor = Decimal::ONE;
    for _ in 0..years {
        factor *= base;
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decay_factor_zero_years_is_one() {
        assert_eq!(decay_factor(dec!(0.006), 0), Decimal::ONE);
    }

    #[test]
    fn test_decay_factor_two_years() {
        assert_eq!(decay_factor(dec!(0.5), 2), dec!(0.25));
    }

    #[test]
    fn test_per_technology_iter_order() {
        let values = PerTechnology {
            wind: 1,
            ground_pv: 2,
            agri_pv_vertical: 3,
            agri_pv_horizontal: 4,
        };
        let collected: Vec<_> = values.iter().map(|(_, v)| *v).collect();
        assert_eq!(collected, vec![1, 2, 3, 4]);
        assert_eq!(*values.get(TechnologyKind::AgriPvVertical), 3);
    }

    #[test]
    fn test_technology_display() {
        assert_eq!(TechnologyKind::GroundPv.to_string(), "ground_pv");
        assert!(TechnologyKind::AgriPvHorizontal.is_agri_pv());
        assert!(!TechnologyKind::Wind.is_solar());
    }
}
