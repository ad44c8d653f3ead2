//! # Configuration Management Module
//!
//! ## Purpose
//! Centralized configuration for the Hadith API server: bind address, data
//! directory, and logging, loaded from a TOML file with environment
//! variable overrides and validation.
//!
//! ## Configuration Sources (in order of precedence)
//! 1. Command line arguments (highest priority, applied in `main.rs`)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values (lowest priority)
//!
//! ## Usage
//! ```rust,no_run
//! use hadith_api::config::Config;
//!
//! let config = Config::from_file("config.toml").unwrap();
//! println!("Server port: {}", config.server.port);
//! ```

use crate::errors::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure containing all system settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server and API configuration
    pub server: ServerConfig,
    /// Source document settings
    pub data: DataConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server and API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

/// Source document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding one JSON document per collection
    pub data_dir: PathBuf,
    /// Filename suffix stripped when deriving a collection key
    pub translated_suffix: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Enable structured JSON logging
    pub json_format: bool,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load configuration from a specific file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Configuration file not found: {:?}, using defaults", path);
            let mut config = Self::default();
            config.apply_env_overrides()?;
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|e| ApiError::Config {
            message: format!("Failed to read config file {:?}: {}", path, e),
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ApiError::Config {
            message: format!("Failed to parse config file {:?}: {}", path, e),
        })?;

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HADITH_API_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("HADITH_API_PORT") {
            self.server.port = port.parse().map_err(|_| ApiError::Config {
                message: "Invalid port number in HADITH_API_PORT".to_string(),
            })?;
        }
        if let Ok(data_dir) = std::env::var("HADITH_API_DATA_DIR") {
            self.data.data_dir = PathBuf::from(data_dir);
        }

        Ok(())
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ApiError::Config {
                message: "server.port cannot be zero".to_string(),
            });
        }

        if self.data.translated_suffix.is_empty() {
            return Err(ApiError::Config {
                message: "data.translated_suffix cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                enable_cors: true,
            },
            data: DataConfig {
                data_dir: PathBuf::from("./data"),
                translated_suffix: "-Translated.json".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json_format: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.data.translated_suffix, "-Translated.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
host = "0.0.0.0"
port = 9090
enable_cors = false

[data]
data_dir = "/srv/hadith"
translated_suffix = "-Translated.json"

[logging]
level = "debug"
json_format = true
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.data.data_dir, PathBuf::from("/srv/hadith"));
        assert_eq!(config.logging.level, "debug");
    }
}
