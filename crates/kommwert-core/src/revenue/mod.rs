pub mod estimate;
pub mod groups;
pub mod scenarios;
