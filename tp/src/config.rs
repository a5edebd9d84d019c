//! Trip planner configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::GeoPoint;

/// Environment variable that overrides the backend base URL
pub const API_URL_ENV: &str = "TRIP_PLANNER_API_URL";

/// Backend base URL when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend connection
    pub api: ApiConfig,

    /// Map viewport defaults
    pub map: MapConfig,

    /// Terminal UI settings
    pub tui: TuiConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        let base_url = self.api.resolved_base_url();
        if base_url.is_empty() {
            return Err(eyre::eyre!("Backend base URL is empty. Set api.base-url or {}.", API_URL_ENV));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(eyre::eyre!("Backend base URL must be http(s), got '{}'", base_url));
        }
        if self.api.timeout_ms == 0 {
            return Err(eyre::eyre!("api.timeout-ms must be greater than zero"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .tripplanner.yml
        let local_config = PathBuf::from(".tripplanner.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/tripplanner/tripplanner.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("tripplanner").join("tripplanner.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the trip-planning backend
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 120_000,
        }
    }
}

impl ApiConfig {
    /// Base URL after applying the environment override, without trailing slashes
    pub fn resolved_base_url(&self) -> String {
        let from_env = std::env::var(API_URL_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let url = from_env.unwrap_or_else(|| self.base_url.trim().to_string());
        url.trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Map viewport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Zoom level used whenever the map recenters
    pub zoom: u8,

    /// Latitude shown when a result has no usable center
    #[serde(rename = "default-lat")]
    pub default_lat: f64,

    /// Longitude shown when a result has no usable center
    #[serde(rename = "default-lon")]
    pub default_lon: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: crate::map::DEFAULT_ZOOM,
            default_lat: crate::map::DEFAULT_CENTER.lat,
            default_lon: crate::map::DEFAULT_CENTER.lon,
        }
    }
}

impl MapConfig {
    pub fn default_center(&self) -> GeoPoint {
        GeoPoint::new(self.default_lat, self.default_lon).unwrap_or(crate::map::DEFAULT_CENTER)
    }
}

/// Terminal UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Event poll interval in milliseconds
    #[serde(rename = "tick-ms")]
    pub tick_ms: u64,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_ms: 33 }
    }
}
