pub mod carryforward;
pub mod loan;
pub mod profit;
