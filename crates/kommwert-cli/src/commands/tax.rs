use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use kommwert_core::tax::income_tax::personal_income_tax;
use kommwert_core::tax::trade_tax::trade_tax;

/// Arguments for the personal income tax
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct IncomeTaxArgs {
    /// Taxable income in EUR
    #[arg(long)]
    pub income: Decimal,
}

/// Arguments for the municipal trade tax
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TradeTaxArgs {
    /// Business profit in EUR
    #[arg(long)]
    pub profit: Decimal,

    /// Tax-free allowance
    #[arg(long, default_value_t = dec!(24500))]
    pub allowance: Decimal,

    /// Base rate (Steuermesszahl)
    #[arg(long, default_value_t = dec!(0.035))]
    pub base_rate: Decimal,

    /// Municipal multiplier as a factor, e.g. 3.34 for a Hebesatz of 334%
    #[arg(long, default_value_t = dec!(3.34))]
    pub multiplier: Decimal,
}

pub fn run_income_tax(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tax = personal_income_tax(args.income)?;
    Ok(json!({
        "result": {
            "income": args.income,
            "income_tax": tax,
        }
    }))
}

pub fn run_trade_tax(args: TradeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let t = trade_tax(args.profit, args.allowance, args.base_rate, args.multiplier);
    let mut warnings = Vec::new();
    if args.profit <= args.allowance {
        warnings.push(format!(
            "Profit does not exceed the allowance of {}; values are negative or zero",
            args.allowance
        ));
    }
    Ok(json!({
        "result": {
            "profit": args.profit,
            "total": t.total,
            "municipal_share": t.municipal_share,
        },
        "warnings": warnings,
    }))
}
