use serde::Deserialize;
use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::dataset::DEFAULT_TOP_N;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "AIRPORT_EXPLORER_CONFIG";

const CONFIG_PATH: &str = "Explorer.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub comparison_region: String,
    pub top_n: usize,
    pub map_zoom: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: PathBuf::from("data/new_england_airports.csv"),
            comparison_region: "US-MA".to_string(),
            top_n: DEFAULT_TOP_N,
            map_zoom: 5.0,
        }
    }
}

impl AppConfig {
    /// `$AIRPORT_EXPLORER_CONFIG`, else `Explorer.toml` when present, else defaults
    pub fn load() -> Result<Self, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(PathBuf::from(path));
        }

        let path = Path::new(CONFIG_PATH);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config = AppConfig::from_toml("comparison_region = \"US-NH\"\ntop_n = 5\n").unwrap();
        assert_eq!(config.comparison_region, "US-NH");
        assert_eq!(config.top_n, 5);
        assert_eq!(config.map_zoom, 5.0);
    }

    #[test]
    fn test_default_region_is_not_configurable() {
        // Older files still parse; the default summary always uses DEFAULT_REGION.
        let config = AppConfig::from_toml("default_region = \"US-ME\"\n").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "data_path = \"/tmp/airports.csv\"\nmap_zoom = 6.5\n").unwrap();
        let config = AppConfig::from_file(tmp.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("/tmp/airports.csv"));
        assert_eq!(config.map_zoom, 6.5);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            AppConfig::from_toml("top_n = \"ten\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            AppConfig::from_file("/no/such/Explorer.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
