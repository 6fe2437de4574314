//! Configuration management for the FreshExpress catalog.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/freshexpress/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog browsing settings
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML or fail validation
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, falling back to defaults if
    /// the file does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `FRESH_DEFAULT_SORT`: Override the initial sort key
    /// - `FRESH_PREFERENCES_ENABLED`: Override the preference gate (true/false)
    /// - `FRESH_RULES_PATH`: Override the rule-book file location
    pub fn load_with_env() -> ConfigResult<Self> {
        Self::load_layered(&Self::config_path()?, |key| std::env::var(key).ok())
    }

    /// Load `config_path` (or defaults), then apply overrides from `lookup`.
    pub fn load_layered(
        config_path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let mut config = Self::load_from(config_path)?;
        config.apply_env(lookup);
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Values that fail to parse are ignored and the file value is kept.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("FRESH_DEFAULT_SORT") {
            tracing::debug!("Override catalog.default_sort from env: {}", val);
            self.catalog.default_sort = val;
        }

        if let Some(val) = lookup("FRESH_PREFERENCES_ENABLED") {
            match val.parse() {
                Ok(enabled) => {
                    self.catalog.preferences_enabled = enabled;
                    tracing::debug!("Override catalog.preferences_enabled from env: {}", enabled);
                }
                Err(_) => tracing::warn!(value = %val, "ignoring FRESH_PREFERENCES_ENABLED"),
            }
        }

        if let Some(val) = lookup("FRESH_RULES_PATH") {
            tracing::debug!("Override catalog.rules_path from env: {}", val);
            self.catalog.rules_path = Some(PathBuf::from(val));
        }
    }

    /// Check values that TOML typing alone cannot catch.
    pub fn validate(&self) -> ConfigResult<()> {
        let ceiling = self.catalog.price_ceiling;
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "catalog.price_ceiling".to_string(),
                reason: format!("must be a positive number, got {ceiling}"),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/freshexpress/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("com", "freshexpress", "freshexpress")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Catalog browsing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Initial sort key: `featured`, `priceLow`, `priceHigh`, `nameAZ`, `nameZA` or `rating`
    pub default_sort: String,
    /// Whether new queries apply the shopper's preferences
    pub preferences_enabled: bool,
    /// Upper end of the price filter inputs
    pub price_ceiling: f64,
    /// Optional rule-book TOML replacing the built-in keyword tables
    pub rules_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_sort: "featured".to_string(),
            preferences_enabled: false,
            price_ceiling: 50.0,
            rules_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.default_sort, "featured");
        assert!(!config.catalog.preferences_enabled);
        assert!((config.catalog.price_ceiling - 50.0).abs() < f64::EPSILON);
        assert!(config.catalog.rules_path.is_none());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[catalog]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.catalog.default_sort, config.catalog.default_sort);
    }

    #[test]
    fn test_config_load_from_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.catalog.default_sort = "priceLow".to_string();
        config.catalog.preferences_enabled = true;

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded = AppConfig::load_from(&config_path).expect("load config");
        assert_eq!(loaded.catalog.default_sort, "priceLow");
        assert!(loaded.catalog.preferences_enabled);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let tmp = TempDir::new().expect("create temp dir");
        let loaded = AppConfig::load_from(&tmp.path().join("absent.toml")).expect("load config");
        assert_eq!(loaded.catalog.default_sort, "featured");
    }

    #[test]
    fn test_invalid_price_ceiling_rejected() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[catalog]\nprice_ceiling = -5.0\n").expect("write config file");

        let err = AppConfig::load_from(&config_path).expect_err("negative ceiling");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FRESH_DEFAULT_SORT", "rating"),
            ("FRESH_PREFERENCES_ENABLED", "true"),
            ("FRESH_RULES_PATH", "/etc/freshexpress/rules.toml"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| vars.get(key).map(ToString::to_string));

        assert_eq!(config.catalog.default_sort, "rating");
        assert!(config.catalog.preferences_enabled);
        assert_eq!(
            config.catalog.rules_path.as_deref(),
            Some(Path::new("/etc/freshexpress/rules.toml"))
        );
    }

    #[test]
    fn test_env_layered_over_file() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");
        fs::write(
            &config_path,
            "[catalog]\ndefault_sort = \"priceLow\"\npreferences_enabled = true\n",
        )
        .expect("write config file");

        let vars: HashMap<&str, &str> = [("FRESH_DEFAULT_SORT", "nameZA")].into_iter().collect();
        let config = AppConfig::load_layered(&config_path, |key| {
            vars.get(key).map(ToString::to_string)
        })
        .expect("load layered config");

        assert_eq!(config.catalog.default_sort, "nameZA");
        assert!(config.catalog.preferences_enabled);

        let defaults = AppConfig::load_layered(&tmp.path().join("absent.toml"), |_| None)
            .expect("load defaults");
        assert_eq!(defaults.catalog.default_sort, "featured");
    }

    #[test]
    fn test_config_path_location() {
        match AppConfig::config_path() {
            Ok(path) => {
                assert!(path.ends_with("config.toml"));
                let dir = path
                    .parent()
                    .and_then(Path::file_name)
                    .and_then(|name| name.to_str())
                    .expect("config dir name");
                assert!(dir.contains("freshexpress"));
            }
            // No home directory in this environment
            Err(err) => assert!(matches!(err, ConfigError::NoConfigDir)),
        }
    }

    #[test]
    fn test_unparseable_env_value_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(|key| (key == "FRESH_PREFERENCES_ENABLED").then(|| "yes".to_string()));
        assert!(!config.catalog.preferences_enabled);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[catalog]
default_sort = "nameAZ"
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.catalog.default_sort, "nameAZ");
        // These should be defaults
        assert!(!config.catalog.preferences_enabled);
        assert!((config.catalog.price_ceiling - 50.0).abs() < f64::EPSILON);
    }
}
