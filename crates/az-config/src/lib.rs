//! AdminZone Console Configuration
//!
//! Settings are read from an optional TOML file and then overridden from
//! the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ADMINZONE_API_BASE_URL` | `http://localhost:8080/api` | Backend base URL including `/api` |
//! | `ADMINZONE_API_CONNECT_TIMEOUT_SECS` | `10` | TCP connect timeout |
//! | `ADMINZONE_API_REQUEST_TIMEOUT_SECS` | `30` | Whole-request timeout |
//! | `ADMINZONE_UI_DEFAULT_PAGE_SIZE` | `10` | Page size for list views |
//! | `ADMINZONE_UI_AUDIT_PAGE_SIZE` | `25` | Page size for the audit view |
//! | `ADMINZONE_UI_LOOKUP_SIZE` | `1000` | Size of student/course pick lists |
//! | `ADMINZONE_UI_MAX_NOTIFICATIONS` | `3` | Visible notification cap |
//! | `ADMINZONE_VALIDATION_STRICT_PHONE` | `false` | Require a 10-digit phone number |
//! | `ADMINZONE_EXPORT_DIRECTORY` | `.` | Where CSV exports are saved |

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const ENV_PREFIX: &str = "ADMINZONE_";

/// Page sizes offered by list views
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [10, 25, 50];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// View defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub default_page_size: u32,
    pub audit_page_size: u32,
    pub lookup_size: u32,
    pub max_notifications: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            audit_page_size: 25,
            lookup_size: 1000,
            max_notifications: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub strict_phone: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

/// Complete console configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub validation: ValidationConfig,
    pub export: ExportConfig,
}

impl ConsoleConfig {
    /// Parse a TOML document; missing sections and keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        info!(path = %path.display(), base_url = %config.api.base_url, "Loaded console configuration");
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `ADMINZONE_*` overrides read through `lookup`, then validate.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("API_BASE_URL") {
            debug!(key = %key, "Overriding from environment");
            self.api.base_url = value;
        }
        if let Some((key, value)) = var("API_CONNECT_TIMEOUT_SECS") {
            self.api.connect_timeout_secs = parse_value(&key, &value)?;
        }
        if let Some((key, value)) = var("API_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = parse_value(&key, &value)?;
        }
        if let Some((key, value)) = var("UI_DEFAULT_PAGE_SIZE") {
            self.ui.default_page_size = parse_value(&key, &value)?;
        }
        if let Some((key, value)) = var("UI_AUDIT_PAGE_SIZE") {
            self.ui.audit_page_size = parse_value(&key, &value)?;
        }
        if let Some((key, value)) = var("UI_LOOKUP_SIZE") {
            self.ui.lookup_size = parse_value(&key, &value)?;
        }
        if let Some((key, value)) = var("UI_MAX_NOTIFICATIONS") {
            self.ui.max_notifications = parse_value(&key, &value)?;
        }
        if let Some((key, value)) = var("VALIDATION_STRICT_PHONE") {
            self.validation.strict_phone = parse_bool(&key, &value)?;
        }
        if let Some((_, value)) = var("EXPORT_DIRECTORY") {
            self.export.directory = PathBuf::from(value);
        }

        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.base_url.trim();
        if base_url.is_empty() {
            return Err(ConfigError::invalid("api.base_url", "must not be empty"));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::invalid("api.base_url", "must start with http:// or https://"));
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("api.request_timeout_secs", "must be positive"));
        }
        for (key, size) in [
            ("ui.default_page_size", self.ui.default_page_size),
            ("ui.audit_page_size", self.ui.audit_page_size),
        ] {
            if !PAGE_SIZE_OPTIONS.contains(&size) {
                return Err(ConfigError::invalid(key, format!("must be one of {:?}", PAGE_SIZE_OPTIONS)));
            }
        }
        if self.ui.lookup_size == 0 {
            return Err(ConfigError::invalid("ui.lookup_size", "must be positive"));
        }
        if self.ui.max_notifications == 0 {
            return Err(ConfigError::invalid("ui.max_notifications", "must be at least 1"));
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("cannot parse '{}'", value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid(key, format!("cannot parse '{}' as a boolean", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.ui.default_page_size, 10);
        assert_eq!(config.ui.audit_page_size, 25);
        assert_eq!(config.ui.lookup_size, 1000);
        assert_eq!(config.ui.max_notifications, 3);
        assert!(!config.validation.strict_phone);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            [api]
            base_url = "https://admin.example.ro/api"

            [validation]
            strict_phone = true
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://admin.example.ro/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert!(config.validation.strict_phone);
        assert_eq!(config.ui, UiConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConsoleConfig::default();
        config
            .apply_env(env(&[
                ("ADMINZONE_API_BASE_URL", "http://10.0.0.5:8080/api"),
                ("ADMINZONE_UI_DEFAULT_PAGE_SIZE", "25"),
                ("ADMINZONE_VALIDATION_STRICT_PHONE", "yes"),
                ("ADMINZONE_EXPORT_DIRECTORY", "/tmp/exports"),
            ]))
            .unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8080/api");
        assert_eq!(config.ui.default_page_size, 25);
        assert!(config.validation.strict_phone);
        assert_eq!(config.export.directory, PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn test_invalid_env_value_names_the_key() {
        let mut config = ConsoleConfig::default();
        let err = config
            .apply_env(env(&[("ADMINZONE_API_REQUEST_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("ADMINZONE_API_REQUEST_TIMEOUT_SECS"));
    }

    #[test]
    fn test_rejects_unsupported_page_size() {
        let err = ConsoleConfig::from_toml_str("[ui]\ndefault_page_size = 7\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "ui.default_page_size"));
    }

    #[test]
    fn test_rejects_base_url_without_scheme() {
        let err = ConsoleConfig::from_toml_str("[api]\nbase_url = \"localhost/api\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
