pub mod income_tax;
pub mod trade_tax;
