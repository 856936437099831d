use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable consulted when `weather.api_key` is empty.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const DEFAULT_CATALOG_URL: &str = "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/geonames-all-cities-with-a-population-1000";
const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding config.toml and state.json
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Dataset URL; `/records` is appended per request
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_CATALOG_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// Temperature unit requested from the weather service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    /// Kelvin, the service default
    #[default]
    Standard,
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub base_url: String,

    /// API key (empty means read from OPENWEATHER_API_KEY)
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub temperature_unit: TemperatureUnit,

    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_WEATHER_URL.to_string(),
            api_key: String::new(),
            temperature_unit: TemperatureUnit::default(),
            timeout_secs: 10,
        }
    }
}

impl WeatherConfig {
    /// The configured key, or the environment fallback.
    pub fn effective_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_string());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows from the end of the list at which the next page is requested
    #[serde(default = "default_scroll_threshold")]
    pub scroll_threshold: usize,

    /// How long the shell waits for outstanding fetches before redrawing
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Table rows drawn per screen
    #[serde(default = "default_visible_rows")]
    pub visible_rows: usize,
}

fn default_scroll_threshold() -> usize {
    3
}

fn default_settle_ms() -> u64 {
    1500
}

fn default_visible_rows() -> usize {
    15
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            scroll_threshold: default_scroll_threshold(),
            settle_ms: default_settle_ms(),
            visible_rows: default_visible_rows(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            catalog: CatalogConfig::default(),
            weather: WeatherConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cityweather")
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist.
    ///
    /// A freshly created config keeps its state next to the file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let mut config = Self::default();
            if let Some(parent) = path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Load from `path`, or from the default location when `None`.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Self::load(),
        }
    }

    /// Validate, logging warnings and failing on errors.
    pub fn into_validated(self) -> Result<(Self, ValidationResult), ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&self.catalog.base_url, "catalog.base_url", &mut result);
        Self::validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.catalog.timeout_secs == 0 {
            result.add_error("catalog.timeout_secs", "Timeout must be greater than 0");
        }
        if self.weather.timeout_secs == 0 {
            result.add_error("weather.timeout_secs", "Timeout must be greater than 0");
        }

        if self.weather.effective_api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured (set it here or in {API_KEY_ENV}) - weather requests will be rejected"),
            );
        }

        if self.ui.visible_rows == 0 {
            result.add_error("ui.visible_rows", "At least one row must be visible");
        }

        if self.ui.settle_ms > 60_000 {
            result.add_warning("ui.settle_ms", "Redraw wait is more than a minute");
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
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

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Path of the persistent key-value state file
    pub fn state_path(&self) -> PathBuf {
        self.config_dir.join("state.json")
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("cityweather");

        Ok(config_dir.join("config.toml"))
    }
}
