use clap::Args;
use serde_json::Value;

use kommwert_core::simulation::profit::{run_simulation, SimulationInput};

use crate::input;

/// Arguments for a single operator profit simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: SimulationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input file or piped JSON is required for a simulation".into());
    };

    let result = run_simulation(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}
