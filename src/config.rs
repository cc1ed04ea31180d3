use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Env var naming a JSON config file.
pub const CONFIG_ENV: &str = "VEHICLE_DASHBOARD_CONFIG";
/// Env var overriding `data_path`.
pub const DATA_ENV: &str = "VEHICLE_DASHBOARD_DATA";
/// Config file looked up in the working directory when `CONFIG_ENV` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default so an empty `{}` is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// CSV file loaded at startup.
    pub data_path: PathBuf,
    /// Manufacturer selected by default whenever it is available.
    pub preferred_manufacturer: String,
    /// Fixed histogram bin count; automatic when absent.
    pub histogram_bins: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("vehicles_us.csv"),
            preferred_manufacturer: "ford".to_string(),
            histogram_bins: None,
        }
    }
}

impl DashboardConfig {
    /// Resolve the configuration from the environment and optional JSON file.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(data) = std::env::var_os(DATA_ENV) {
            config.data_path = PathBuf::from(data);
        }
        log::debug!("Using configuration {config:?}");
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.preferred_manufacturer, "ford");
    }

    #[test]
    fn fields_override_defaults() {
        let config = DashboardConfig::from_json(
            r#"{ "data_path": "data/cars.csv", "histogram_bins": 40 }"#,
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("data/cars.csv"));
        assert_eq!(config.histogram_bins, Some(40));
        assert_eq!(config.preferred_manufacturer, "ford");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(DashboardConfig::from_json(r#"{ "colour": "red" }"#).is_err());
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = DashboardConfig::from_file(Path::new("/no/such/dashboard.json")).unwrap_err();
        assert!(format!("{err:#}").contains("/no/such/dashboard.json"));
    }
}
