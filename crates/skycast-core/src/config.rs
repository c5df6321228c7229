use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const API_KEY_PLACEHOLDER: &str = "YOUR_OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Widget behavior
    #[serde(default)]
    pub ui: UiConfig,
}

/// Measurement convention requested from the weather API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    /// Create at: https://home.openweathermap.org/api_keys
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the data API (the `weather` and `forecast` endpoints live under it)
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL icon identifiers are resolved against
    #[serde(default = "default_icon_base_url")]
    pub icon_base_url: String,

    /// Unit system selected at startup
    #[serde(default)]
    pub units: UnitSystem,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_icon_base_url() -> String {
    "https://openweathermap.org/img/wn".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl WeatherConfig {
    /// Check if the API key is configured (not empty or a placeholder)
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            api_base_url: default_api_base_url(),
            icon_base_url: default_icon_base_url(),
            units: UnitSystem::default(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long an error banner stays up before clearing itself
    #[serde(default = "default_error_dismiss_ms")]
    pub error_dismiss_ms: u64,

    /// How often the interactive loop drains finished requests
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_error_dismiss_ms() -> u64 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    50
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            error_dismiss_ms: default_error_dismiss_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist.
    ///
    /// `OPENWEATHER_API_KEY` takes precedence over the file's `weather.api_key`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string()))
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            config
        };

        config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::validated(Self::load()?)
    }

    /// Like [`Config::load_validated`] but reads from an explicit path.
    pub fn load_validated_from(path: &Path) -> Result<(Self, ValidationResult)> {
        Self::validated(Self::load_from(path)?)
    }

    fn validated(config: Self) -> Result<(Self, ValidationResult)> {
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Replace the API key when an override is present and non-empty.
    pub fn apply_api_key_override(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using API key from {}", API_KEY_ENV);
            self.weather.api_key = key;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.api_base_url, "weather.api_base_url", &mut result);
        self.validate_url(&self.weather.icon_base_url, "weather.icon_base_url", &mut result);

        if !self.weather.is_configured() {
            result.add_warning(
                "weather.api_key",
                format!("API key not configured - set it in the config file or {}", API_KEY_ENV),
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 300 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>300s)",
            );
        }

        if self.ui.error_dismiss_ms == 0 {
            result.add_warning(
                "ui.error_dismiss_ms",
                "Error banners will clear immediately (0 ms)",
            );
        }

        if self.ui.poll_interval_ms == 0 {
            result.add_error("ui.poll_interval_ms", "Poll interval must be greater than 0");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
