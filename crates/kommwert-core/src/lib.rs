pub mod config;
pub mod error;
pub mod profile;
pub mod types;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "land")]
pub mod land;

#[cfg(feature = "capacity")]
pub mod capacity;

#[cfg(feature = "levies")]
pub mod levies;

#[cfg(feature = "simulation")]
pub mod simulation;

#[cfg(feature = "revenue")]
pub mod revenue;

pub use config::ModelConfig;
pub use error::KommWertError;
pub use types::*;

/// Standard result type for all kommwert computations
pub type KommWertResult<T> = Result<T, KommWertError>;
