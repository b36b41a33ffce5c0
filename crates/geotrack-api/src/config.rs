use std::env;
use std::path::PathBuf;
use std::time::Duration;

use geotrack_core::config::LayeredConfig;
use geotrack_core::error::Result;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Optional TOML file with tracking settings
    pub config_path: Option<PathBuf>,
    /// Deadline for route and cluster computations
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_origin: "http://localhost:3000".to_string(),
            config_path: None,
            request_timeout: Duration::from_millis(2000),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var("GEOTRACK_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let cors_origin = env::var("GEOTRACK_CORS_ORIGIN").unwrap_or(defaults.cors_origin);

        let config_path = env::var("GEOTRACK_CONFIG").ok().map(PathBuf::from);

        let request_timeout = env::var("GEOTRACK_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.request_timeout);

        Self {
            port,
            cors_origin,
            config_path,
            request_timeout,
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Build tracking settings: defaults, then the config file, then `GEOTRACK_*` variables
    pub fn tracking_config(&self) -> Result<LayeredConfig> {
        let mut config = LayeredConfig::with_defaults();
        if let Some(path) = &self.config_path {
            config = config.load_from_file(path)?;
        }
        let config = config.load_from_env();
        config.validate()?;
        Ok(config)
    }
}
