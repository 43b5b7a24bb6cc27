use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Read a JSON or YAML file into a typed struct. `.yaml` / `.yml` files are
/// parsed as YAML, anything else as JSON.
pub fn read_input<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;

    let parsed = if is_yaml(&canonical) {
        serde_yaml::from_str(&contents).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(&contents).map_err(|e| e.to_string())
    };
    let value: T = parsed.map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;

    log::debug!("read input from {}", canonical.display());
    Ok(value)
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

/// Resolve the path against the working directory and check it is a file.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kommwert_core::simulation::carryforward::LossCarryforward;

    #[test]
    fn test_yaml_and_json_extensions() {
        assert!(is_yaml(Path::new("config.YAML")));
        assert!(is_yaml(Path::new("config.yml")));
        assert!(!is_yaml(Path::new("input.json")));
        assert!(!is_yaml(Path::new("input")));
    }

    #[test]
    fn test_missing_file_reported() {
        let err = read_input::<LossCarryforward>("/nonexistent/input.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }
}
