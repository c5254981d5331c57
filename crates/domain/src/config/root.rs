use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::cache::CacheConfig;
use super::errors::ConfigError;
use super::geo::GeoConfig;
use super::logging::LoggingConfig;
use super::policy::PolicyConfig;
use super::server::ServerConfig;
use crate::RecordType;

const LOCAL_CONFIG_PATH: &str = "geodns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/geodns/config.toml";

/// Which reference implementation backs a geo or policy port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Fixed answer regardless of input.
    #[default]
    Static,
    /// In-memory table loaded from the config file.
    Table,
}

/// Main configuration structure for GeoDNS
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Listener configuration (bind host and port)
    pub server: ServerConfig,

    /// GeoInfo resolver backend
    pub geo: GeoConfig,

    /// RRset policy backend
    pub policy: PolicyConfig,

    /// Response cache in front of the policy backend
    pub cache: CacheConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. geodns.toml in current directory
    /// 3. /etc/geodns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(found) = Self::get_config_path() {
            Self::from_file(&found)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(host) = overrides.bind_host {
            self.server.bind_host = host;
        }
        if let Some(port) = overrides.bind_port {
            self.server.bind_port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }
        self.server.socket_addr()?;

        if self.server.udp_max_payload < 512 {
            return Err(ConfigError::Validation(
                "udp_max_payload must be at least 512".to_string(),
            ));
        }

        if self.server.tcp_idle_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "server.tcp_idle_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.cache.enabled && self.cache.purge_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "cache.purge_interval_secs must be greater than 0".to_string(),
            ));
        }

        for entry in &self.geo.networks {
            entry.cidr.parse::<ipnetwork::IpNetwork>().map_err(|e| {
                ConfigError::Validation(format!("Invalid geo CIDR '{}': {}", entry.cidr, e))
            })?;
        }

        for record in &self.policy.records {
            if record.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Policy record with empty name".to_string(),
                ));
            }
            let record_type = RecordType::from_str(&record.record_type)
                .map_err(ConfigError::Validation)?;
            if !record_type.is_address() {
                return Err(ConfigError::Validation(format!(
                    "Policy record '{}' has unsupported type {}",
                    record.name, record.record_type
                )));
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub bind_host: Option<String>,
    pub bind_port: Option<u16>,
    pub log_level: Option<String>,
}
