//! Configuration management for the Powdertime application
//!
//! Handles loading configuration from files and environment variables,
//! and validates every setting once at load time.

use crate::PowdertimeError;
use crate::location_resolver::LocationSpec;
use crate::resorts::ResortSpec;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for the Powdertime application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowdertimeConfig {
    /// Search origin
    #[serde(default)]
    pub location: LocationConfig,
    /// Search radius in miles
    #[serde(default = "default_search_radius")]
    pub search_radius_miles: f64,
    #[serde(default)]
    pub snow_threshold: SnowThresholdConfig,
    /// Manual resort list; overrides the location search when present
    #[serde(default)]
    pub resorts: Option<Vec<ResortSpec>>,
    /// Hours between checks in watch mode
    #[serde(default = "default_check_frequency")]
    pub check_frequency_hours: u64,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location block. Coordinates win over zipcode, which wins over city.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub zipcode: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnowThresholdConfig {
    /// Minimum total snowfall in inches for an alert
    #[serde(default = "default_min_inches")]
    pub min_inches: f64,
    /// Days of forecast to check; the provider caps this at 16
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,
}

/// Notification channel selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMethod {
    #[default]
    Console,
    Email,
    Webhook,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub method: NotificationMethod,
    /// Send a confirmation even when no significant snow is found
    #[serde(default)]
    pub always_notify: bool,
    /// Include per-resort totals in console output
    #[serde(default = "default_true")]
    pub forecast_summary: bool,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub from_email: Option<String>,
    pub to_email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: Option<String>,
}

/// Upstream API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL for the Open-Meteo forecast API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Base URL for the Nominatim geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Timezone used to align daily forecast boundaries
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_search_radius() -> f64 {
    100.0
}

fn default_min_inches() -> f64 {
    6.0
}

fn default_forecast_days() -> u32 {
    10
}

fn default_check_frequency() -> u64 {
    6
}

fn default_true() -> bool {
    true
}

fn default_smtp_port() -> u16 {
    587
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_weather_timeout() -> u32 {
    10
}

fn default_timezone() -> String {
    "America/Denver".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for SnowThresholdConfig {
    fn default() -> Self {
        Self {
            min_inches: default_min_inches(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            method: NotificationMethod::default(),
            always_notify: false,
            forecast_summary: default_true(),
            email: EmailConfig::default(),
            webhook: WebhookConfig::default(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: None,
            smtp_port: default_smtp_port(),
            from_email: None,
            to_email: None,
            password: None,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_base_url(),
            geocoding_url: default_geocoding_url(),
            timeout_seconds: default_weather_timeout(),
            timezone: default_timezone(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for PowdertimeConfig {
    fn default() -> Self {
        Self {
            location: LocationConfig::default(),
            search_radius_miles: default_search_radius(),
            snow_threshold: SnowThresholdConfig::default(),
            resorts: None,
            check_frequency_hours: default_check_frequency(),
            notifications: NotificationConfig::default(),
            weather: WeatherConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl EmailConfig {
    /// Names of required settings that are missing or empty
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("smtp_server", &self.smtp_server),
            ("from_email", &self.from_email),
            ("to_email", &self.to_email),
            ("password", &self.password),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }
}

impl PowdertimeConfig {
    /// Load configuration from the default locations and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified path.
    ///
    /// An explicit path must exist. Without one, `./config.toml` is tried,
    /// then the user config directory.
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        Self::load_with_location(config_path, None)
    }

    /// Load configuration, searching around `location` instead of the
    /// configured location or resort list when one is given.
    pub fn load_with_location(
        config_path: Option<PathBuf>,
        location: Option<&LocationSpec>,
    ) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(PowdertimeError::config(format!(
                        "Configuration file not found: {}",
                        path.display()
                    ))
                    .into());
                }
                Some(path)
            }
            None => Self::default_config_file(Path::new("."), Self::get_config_path()),
        };

        Self::load_layered(config_file.as_deref(), Self::environment(), location)
    }

    /// Environment overrides, e.g. POWDERTIME_SEARCH_RADIUS_MILES or
    /// POWDERTIME_NOTIFICATIONS__METHOD.
    ///
    /// Values stay strings so zipcodes keep leading zeros; numeric and bool
    /// fields are converted during deserialization.
    fn environment() -> Environment {
        Environment::with_prefix("POWDERTIME")
            .prefix_separator("_")
            .separator("__")
    }

    fn load_layered(
        config_file: Option<&Path>,
        environment: Environment,
        location: Option<&LocationSpec>,
    ) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(config_file) = config_file {
            builder = builder.add_source(
                File::from(config_file)
                    .required(true)
                    .format(config::FileFormat::Toml),
            );
        }

        builder = builder.add_source(environment);

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: PowdertimeConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if let Some(location) = location {
            config.location = LocationConfig::from(location);
            config.resorts = None;
        }

        config.validate()?;

        Ok(config)
    }

    /// `config.toml` in `working_dir` wins over the per-user file
    fn default_config_file(working_dir: &Path, user_config: Option<PathBuf>) -> Option<PathBuf> {
        let local = working_dir.join("config.toml");
        if local.exists() {
            return Some(local);
        }
        user_config.filter(|path| path.exists())
    }

    /// Get the per-user configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("powdertime").join("config.toml"))
    }

    /// Whether a manual resort list replaces the location search
    #[must_use]
    pub fn has_manual_resorts(&self) -> bool {
        self.resorts.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_notifications()?;
        self.validate_search()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if !self.search_radius_miles.is_finite() || self.search_radius_miles <= 0.0 {
            return Err(
                PowdertimeError::config("Search radius must be a positive number of miles").into(),
            );
        }

        let threshold = self.snow_threshold.min_inches;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(PowdertimeError::config(
                "Snow threshold must be a non-negative number of inches",
            )
            .into());
        }

        if self.snow_threshold.forecast_days == 0 {
            return Err(PowdertimeError::config("Forecast days must be at least 1").into());
        }

        if self.check_frequency_hours == 0 || self.check_frequency_hours > MAX_CHECK_FREQUENCY_HOURS {
            return Err(PowdertimeError::config(format!(
                "Check frequency must be between 1 and {MAX_CHECK_FREQUENCY_HOURS} hours"
            ))
            .into());
        }

        if self.weather.timeout_seconds == 0 || self.weather.timeout_seconds > 300 {
            return Err(PowdertimeError::config(
                "Weather API timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PowdertimeError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PowdertimeError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Weather API base URL", &self.weather.base_url),
            ("Geocoding base URL", &self.weather.geocoding_url),
        ] {
            if !is_http_url(url) {
                return Err(PowdertimeError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_notifications(&self) -> Result<()> {
        match self.notifications.method {
            NotificationMethod::Console => {}
            NotificationMethod::Email => {
                let missing = self.notifications.email.missing_fields();
                if !missing.is_empty() {
                    return Err(PowdertimeError::config(format!(
                        "Email configuration incomplete, missing: {}",
                        missing.join(", ")
                    ))
                    .into());
                }
            }
            NotificationMethod::Webhook => {
                let url = self.notifications.webhook.url.as_deref().unwrap_or_default();
                if !is_http_url(url) {
                    return Err(PowdertimeError::config(
                        "Webhook URL not configured or not an HTTP(S) URL",
                    )
                    .into());
                }
            }
        }
        Ok(())
    }

    fn validate_search(&self) -> Result<()> {
        if self.has_manual_resorts() {
            return Ok(());
        }
        LocationSpec::from_config(&self.location)?;
        Ok(())
    }

    /// Write an annotated example configuration to `path`, creating parent
    /// directories. An existing file is never overwritten.
    pub fn write_example(path: &Path) -> Result<()> {
        if path.exists() {
            return Err(
                PowdertimeError::config(format!("{} already exists", path.display())).into(),
            );
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        std::fs::write(path, EXAMPLE_CONFIG)
            .with_context(|| format!("Failed to write example config: {}", path.display()))
    }
}

/// One year
const MAX_CHECK_FREQUENCY_HOURS: u64 = 24 * 365;

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Example configuration shipped with the binary
pub const EXAMPLE_CONFIG: &str = include_str!("../config/default.toml");
