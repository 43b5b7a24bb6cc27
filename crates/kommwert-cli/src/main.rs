mod commands;
mod input;
mod log;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::capacity::NormalizeArgs;
use commands::estimate::EstimateArgs;
use commands::simulation::SimulateArgs;
use commands::tax::{IncomeTaxArgs, TradeTaxArgs};

/// Municipal revenue from wind, PV and agri-PV installations
#[derive(Parser)]
#[command(
    name = "kommwert",
    version,
    about = "Municipal revenue from wind, PV and agri-PV installations",
    long_about = "Estimates what a municipality earns from renewable installations over \
                  25 years: lease income and its tax effects, EEG participation levy, \
                  Wind-/Solar-Euro and the trade tax paid by plant operators."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level (off, error, warn, info, debug, trace); falls back to KOMMWERT_LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full municipal revenue estimate
    Estimate(EstimateArgs),
    /// Personal income tax on a taxable income
    IncomeTax(IncomeTaxArgs),
    /// Municipal trade tax on a business profit
    TradeTax(TradeTaxArgs),
    /// Fill in missing area or capacity per technology
    Normalize(NormalizeArgs),
    /// Simulate one operator scenario year by year
    Simulate(SimulateArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = log::init(cli.log_level.as_deref()) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Estimate(args) => commands::estimate::run_estimate(args),
        Commands::IncomeTax(args) => commands::tax::run_income_tax(args),
        Commands::TradeTax(args) => commands::tax::run_trade_tax(args),
        Commands::Normalize(args) => commands::capacity::run_normalize(args),
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::Version => {
            println!("kommwert {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
