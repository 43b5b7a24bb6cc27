pub mod investment;
pub mod normalizer;
