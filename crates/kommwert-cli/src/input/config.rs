use kommwert_core::config::ModelConfig;

use crate::input::file::read_input;

/// Load a model configuration, or the built-in defaults when no path is given.
///
/// Sections and fields missing from the file keep their defaults.
pub fn load_config(path: Option<&str>) -> Result<ModelConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ModelConfig::default());
    };

    let config: ModelConfig = read_input(path)?;
    config.validate()?;

    log::info!("loaded model configuration from {path}");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::fs;

    #[test]
    fn test_defaults_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.lease.ground_pv_per_ha, dec!(3000));
    }

    #[test]
    fn test_yaml_overrides() {
        let path =
            std::env::temp_dir().join(format!("kommwert-config-{}.yaml", std::process::id()));
        fs::write(&path, "tax:\n  fallback_municipal_multiplier: \"4.1\"\n").unwrap();
        let config = load_config(path.to_str()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(config.tax.fallback_municipal_multiplier, dec!(4.1));
        assert_eq!(config.lease.wind_per_mw, dec!(16000));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let path =
            std::env::temp_dir().join(format!("kommwert-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "levy": { "horizon_years": 0 } }"#).unwrap();
        let result = load_config(path.to_str());
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
