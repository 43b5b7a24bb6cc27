pub mod participation;
pub mod state_bonus;
