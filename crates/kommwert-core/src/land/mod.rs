pub mod allocation;
pub mod ownership;
