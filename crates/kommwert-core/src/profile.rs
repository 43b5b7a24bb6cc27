use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::KommWertError;
use crate::KommWertResult;

/// One year of normalized generation, one value per period (typically hourly).
///
/// Multiplied by installed MW, each value is the energy fed in during that
/// period in MWh.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputProfile {
    pub values: Vec<Decimal>,
}

impl OutputProfile {
    pub fn new(values: Vec<Decimal>) -> Self {
        OutputProfile { values }
    }

    /// Full-load equivalent of the profile.
    pub fn total(&self) -> Decimal {
        self.values.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn validate(&self, field: &str) -> KommWertResult<()> {
        if self.values.is_empty() {
            return Err(KommWertError::MissingInput {
                field: format!("{field} (profile has no periods)"),
            });
        }
        if let Some(i) = self.values.iter().position(|v| *v < Decimal::ZERO) {
            return Err(KommWertError::InvalidInput {
                field: format!("{field}[{i}]"),
                reason: "Generation cannot be negative".into(),
            });
        }
        Ok(())
    }
}

impl From<Vec<Decimal>> for OutputProfile {
    fn from(values: Vec<Decimal>) -> Self {
        OutputProfile::new(values)
    }
}
