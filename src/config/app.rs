//! Main application configuration
//!
//! Configuration is explicit and passed into the server bootstrap; nothing
//! in the engine or service reads process-global state. Values come from
//! defaults, then an optional TOML file or environment variables, then CLI
//! overrides applied in `main`.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub cors: CorsSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Port for the HTTP server
    pub http_port: u16,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,
}

/// Cross-origin settings for the prediction endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Origins allowed to call the API. "null" is a literal origin value
    /// sent by pages loaded from file:// URLs.
    pub allowed_origins: Vec<String>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "lrd-rating".to_string(),
            log_level: "info".to_string(),
            http_port: 8080,
            shutdown_timeout_seconds: 30,
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost".to_string(),
                "http://127.0.0.1".to_string(),
                "null".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = env::var("SERVICE_NAME") {
            config.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            config.service.log_level = log_level;
        }
        if let Ok(port) = env::var("HTTP_PORT") {
            config.service.http_port = port
                .parse()
                .map_err(|_| anyhow!("Invalid HTTP_PORT value: {}", port))?;
        }
        if let Ok(timeout) = env::var("SHUTDOWN_TIMEOUT_SECONDS") {
            config.service.shutdown_timeout_seconds = timeout
                .parse()
                .map_err(|_| anyhow!("Invalid SHUTDOWN_TIMEOUT_SECONDS value: {}", timeout))?;
        }
        if let Ok(origins) = env::var("CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }

        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        validate_config(&config)?;
        Ok(config)
    }

    /// Get shutdown timeout as Duration
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.service.shutdown_timeout_seconds)
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    if config.service.http_port == 0 {
        return Err(anyhow!("HTTP port cannot be 0"));
    }

    if config.service.shutdown_timeout_seconds == 0 {
        return Err(anyhow!("Shutdown timeout must be greater than 0"));
    }

    if config.cors.allowed_origins.is_empty() {
        return Err(anyhow!("CORS allowed origins cannot be empty"));
    }

    Ok(())
}
