pub mod capacity;
pub mod estimate;
pub mod simulation;
pub mod tax;
