use crate::error::{GeotrackError, Result};
use crate::models::TransportMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Largest per-subscriber event buffer accepted from configuration
pub const MAX_SUBSCRIBER_BUFFER: usize = 1 << 20;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Which notification channel alerts are sent through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannelKind {
    /// Write alerts to the log
    #[default]
    Log,
    /// POST alerts as JSON to `webhook_url`
    Webhook,
}

impl FromStr for NotificationChannelKind {
    type Err = GeotrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "log" => Ok(NotificationChannelKind::Log),
            "webhook" => Ok(NotificationChannelKind::Webhook),
            _ => Err(GeotrackError::ConfigInvalid {
                key: "notification_channel".to_string(),
                reason: format!("Invalid notification channel: {}. Use log or webhook", s),
            }),
        }
    }
}

impl fmt::Display for NotificationChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationChannelKind::Log => f.write_str("log"),
            NotificationChannelKind::Webhook => f.write_str("webhook"),
        }
    }
}

/// Layered configuration for the tracking core
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub driving_speed_kmh: ConfigValue<f64>,
    pub walking_speed_kmh: ConfigValue<f64>,
    pub cycling_speed_kmh: ConfigValue<f64>,
    pub traffic_multiplier: ConfigValue<f64>,
    pub online_window_secs: ConfigValue<u64>,
    pub subscriber_buffer: ConfigValue<usize>,
    pub grid_cell_degrees: ConfigValue<f64>,
    pub default_cluster_radius_km: ConfigValue<f64>,
    pub notification_channel: ConfigValue<NotificationChannelKind>,
    pub webhook_url: ConfigValue<Option<String>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            driving_speed_kmh: ConfigValue::new(30.0, ConfigSource::Default),
            walking_speed_kmh: ConfigValue::new(5.0, ConfigSource::Default),
            cycling_speed_kmh: ConfigValue::new(15.0, ConfigSource::Default),
            traffic_multiplier: ConfigValue::new(1.3, ConfigSource::Default),
            online_window_secs: ConfigValue::new(300, ConfigSource::Default),
            subscriber_buffer: ConfigValue::new(256, ConfigSource::Default),
            grid_cell_degrees: ConfigValue::new(0.01, ConfigSource::Default),
            default_cluster_radius_km: ConfigValue::new(5.0, ConfigSource::Default),
            notification_channel: ConfigValue::new(
                NotificationChannelKind::Log,
                ConfigSource::Default,
            ),
            webhook_url: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| GeotrackError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeotrackError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        let source = ConfigSource::File;
        if let Some(v) = file_config.driving_speed_kmh {
            self.driving_speed_kmh.update(v, source);
        }
        if let Some(v) = file_config.walking_speed_kmh {
            self.walking_speed_kmh.update(v, source);
        }
        if let Some(v) = file_config.cycling_speed_kmh {
            self.cycling_speed_kmh.update(v, source);
        }
        if let Some(v) = file_config.traffic_multiplier {
            self.traffic_multiplier.update(v, source);
        }
        if let Some(v) = file_config.online_window_secs {
            self.online_window_secs.update(v, source);
        }
        if let Some(v) = file_config.subscriber_buffer {
            self.subscriber_buffer.update(v, source);
        }
        if let Some(v) = file_config.grid_cell_degrees {
            self.grid_cell_degrees.update(v, source);
        }
        if let Some(v) = file_config.default_cluster_radius_km {
            self.default_cluster_radius_km.update(v, source);
        }
        if let Some(v) = file_config.notification_channel {
            self.notification_channel.update(v, source);
        }
        if let Some(v) = file_config.webhook_url {
            self.webhook_url.update(Some(v), source);
        }

        Ok(self)
    }

    /// Load configuration from `GEOTRACK_*` environment variables
    pub fn load_from_env(mut self) -> Self {
        let source = ConfigSource::Environment;

        if let Some(v) = env_parsed::<f64>("GEOTRACK_DRIVING_SPEED_KMH") {
            self.driving_speed_kmh.update(v, source);
        }
        if let Some(v) = env_parsed::<f64>("GEOTRACK_WALKING_SPEED_KMH") {
            self.walking_speed_kmh.update(v, source);
        }
        if let Some(v) = env_parsed::<f64>("GEOTRACK_CYCLING_SPEED_KMH") {
            self.cycling_speed_kmh.update(v, source);
        }
        if let Some(v) = env_parsed::<f64>("GEOTRACK_TRAFFIC_MULTIPLIER") {
            self.traffic_multiplier.update(v, source);
        }
        if let Some(v) = env_parsed::<u64>("GEOTRACK_ONLINE_WINDOW_SECS") {
            self.online_window_secs.update(v, source);
        }
        if let Some(v) = env_parsed::<usize>("GEOTRACK_SUBSCRIBER_BUFFER") {
            self.subscriber_buffer.update(v, source);
        }
        if let Some(v) = env_parsed::<f64>("GEOTRACK_GRID_CELL_DEGREES") {
            self.grid_cell_degrees.update(v, source);
        }
        if let Some(v) = env_parsed::<f64>("GEOTRACK_CLUSTER_RADIUS_KM") {
            self.default_cluster_radius_km.update(v, source);
        }

        // GEOTRACK_NOTIFICATION_CHANNEL
        if let Ok(channel_str) = env::var("GEOTRACK_NOTIFICATION_CHANNEL") {
            match channel_str.parse::<NotificationChannelKind>() {
                Ok(channel) => self.notification_channel.update(channel, source),
                Err(_) => tracing::warn!(
                    "Invalid GEOTRACK_NOTIFICATION_CHANNEL value '{}': expected log or webhook",
                    channel_str
                ),
            }
        }

        // GEOTRACK_WEBHOOK_URL
        if let Ok(url) = env::var("GEOTRACK_WEBHOOK_URL") {
            self.webhook_url.update(Some(url), source);
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        let source = ConfigSource::Cli;
        if let Some(v) = overrides.driving_speed_kmh {
            self.driving_speed_kmh.update(v, source);
        }
        if let Some(v) = overrides.walking_speed_kmh {
            self.walking_speed_kmh.update(v, source);
        }
        if let Some(v) = overrides.cycling_speed_kmh {
            self.cycling_speed_kmh.update(v, source);
        }
        if let Some(v) = overrides.traffic_multiplier {
            self.traffic_multiplier.update(v, source);
        }
        if let Some(v) = overrides.default_cluster_radius_km {
            self.default_cluster_radius_km.update(v, source);
        }
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("driving_speed_kmh", self.driving_speed_kmh.value),
            ("walking_speed_kmh", self.walking_speed_kmh.value),
            ("cycling_speed_kmh", self.cycling_speed_kmh.value),
            ("traffic_multiplier", self.traffic_multiplier.value),
            ("grid_cell_degrees", self.grid_cell_degrees.value),
            ("default_cluster_radius_km", self.default_cluster_radius_km.value),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(GeotrackError::ConfigInvalid {
                    key: key.to_string(),
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }

        let buffer = self.subscriber_buffer.value;
        if !(1..=MAX_SUBSCRIBER_BUFFER).contains(&buffer) {
            return Err(GeotrackError::ConfigInvalid {
                key: "subscriber_buffer".to_string(),
                reason: format!("must be between 1 and {}, got {}", MAX_SUBSCRIBER_BUFFER, buffer),
            });
        }

        if self.notification_channel.value == NotificationChannelKind::Webhook
            && self.webhook_url.value.is_none()
        {
            return Err(GeotrackError::ConfigMissing {
                key: "webhook_url".to_string(),
            });
        }

        Ok(())
    }

    /// Average speed for a transport mode in km/h
    pub fn speed_kmh(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Driving => self.driving_speed_kmh.value,
            TransportMode::Walking => self.walking_speed_kmh.value,
            TransportMode::Cycling => self.cycling_speed_kmh.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "driving_speed_kmh".to_string(),
            (self.driving_speed_kmh.value.to_string(), self.driving_speed_kmh.source),
        );
        map.insert(
            "walking_speed_kmh".to_string(),
            (self.walking_speed_kmh.value.to_string(), self.walking_speed_kmh.source),
        );
        map.insert(
            "cycling_speed_kmh".to_string(),
            (self.cycling_speed_kmh.value.to_string(), self.cycling_speed_kmh.source),
        );
        map.insert(
            "traffic_multiplier".to_string(),
            (self.traffic_multiplier.value.to_string(), self.traffic_multiplier.source),
        );
        map.insert(
            "online_window_secs".to_string(),
            (self.online_window_secs.value.to_string(), self.online_window_secs.source),
        );
        map.insert(
            "subscriber_buffer".to_string(),
            (self.subscriber_buffer.value.to_string(), self.subscriber_buffer.source),
        );
        map.insert(
            "grid_cell_degrees".to_string(),
            (self.grid_cell_degrees.value.to_string(), self.grid_cell_degrees.source),
        );
        map.insert(
            "default_cluster_radius_km".to_string(),
            (
                self.default_cluster_radius_km.value.to_string(),
                self.default_cluster_radius_km.source,
            ),
        );
        map.insert(
            "notification_channel".to_string(),
            (self.notification_channel.value.to_string(), self.notification_channel.source),
        );
        map.insert(
            "webhook_url".to_string(),
            (
                self.webhook_url.value.clone().unwrap_or_else(|| "(unset)".to_string()),
                self.webhook_url.source,
            ),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Read and parse an environment variable, warning on malformed values
fn env_parsed<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Invalid {} value '{}': expected a number", key, raw);
            None
        }
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    driving_speed_kmh: Option<f64>,
    walking_speed_kmh: Option<f64>,
    cycling_speed_kmh: Option<f64>,
    traffic_multiplier: Option<f64>,
    online_window_secs: Option<u64>,
    subscriber_buffer: Option<usize>,
    grid_cell_degrees: Option<f64>,
    default_cluster_radius_km: Option<f64>,
    notification_channel: Option<NotificationChannelKind>,
    webhook_url: Option<String>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub driving_speed_kmh: Option<f64>,
    pub walking_speed_kmh: Option<f64>,
    pub cycling_speed_kmh: Option<f64>,
    pub traffic_multiplier: Option<f64>,
    pub default_cluster_radius_km: Option<f64>,
}
