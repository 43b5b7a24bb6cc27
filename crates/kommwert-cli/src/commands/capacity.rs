use clap::Args;
use serde_json::Value;

use kommwert_core::capacity::normalizer::{normalize_capacities, NormalizeInput};

use crate::input;

/// Arguments for area/capacity normalization
#[derive(Args)]
pub struct NormalizeArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Model configuration (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run_normalize(args: NormalizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let normalize_input: NormalizeInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input file or piped JSON is required for normalization".into());
    };

    let config = input::config::load_config(args.config.as_deref())?;
    let result = normalize_capacities(&normalize_input, &config.capacity)?;
    Ok(serde_json::to_value(result)?)
}
