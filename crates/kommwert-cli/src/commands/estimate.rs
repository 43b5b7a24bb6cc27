use clap::Args;
use serde_json::Value;

use kommwert_core::revenue::estimate::{estimate_municipal_revenue, EstimateInput};
use kommwert_core::TechnologyKind;

use crate::input;

/// Arguments for a full municipal revenue estimate
#[derive(Args)]
pub struct EstimateArgs {
    /// Path to JSON input file (falls back to piped stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Model configuration (JSON or YAML); defaults apply when omitted
    #[arg(long)]
    pub config: Option<String>,

    /// Wind generation profile (semicolon-delimited CSV)
    #[arg(long)]
    pub wind_profile: Option<String>,

    /// Ground-mounted PV generation profile
    #[arg(long)]
    pub ground_pv_profile: Option<String>,

    /// Vertical agri-PV generation profile
    #[arg(long)]
    pub agri_pv_vertical_profile: Option<String>,

    /// Horizontal agri-PV generation profile
    #[arg(long)]
    pub agri_pv_horizontal_profile: Option<String>,

    /// Profile column to read (default: last column)
    #[arg(long)]
    pub profile_column: Option<String>,
}

pub fn run_estimate(args: EstimateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut estimate_input: EstimateInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input file or piped JSON is required for an estimate".into());
    };

    let profile_paths = [
        (TechnologyKind::Wind, &args.wind_profile),
        (TechnologyKind::GroundPv, &args.ground_pv_profile),
        (TechnologyKind::AgriPvVertical, &args.agri_pv_vertical_profile),
        (TechnologyKind::AgriPvHorizontal, &args.agri_pv_horizontal_profile),
    ];
    for (kind, path) in profile_paths {
        if let Some(path) = path {
            let profile = input::profile::read_profile_csv(path, args.profile_column.as_deref())?;
            log::info!("{kind}: {} profile periods from {path}", profile.len());
            estimate_input.technologies.get_mut(kind).profile = Some(profile);
        }
    }

    let config = input::config::load_config(args.config.as_deref())?;
    let result = estimate_municipal_revenue(&estimate_input, &config)?;
    Ok(serde_json::to_value(result)?)
}
