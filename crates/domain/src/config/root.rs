use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::resolver::{ResolutionStrategy, ResolverConfig};

/// Main configuration structure for peerdns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Endpoint resolution configuration
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. peerdns.toml in current directory
    /// 3. /etc/peerdns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("peerdns.toml").exists() {
            Self::from_file("peerdns.toml")?
        } else if std::path::Path::new("/etc/peerdns/config.toml").exists() {
            Self::from_file("/etc/peerdns/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(strategy) = overrides.strategy {
            self.resolver.strategy = strategy;
        }
        if let Some(server) = overrides.dns_server {
            self.resolver.dns_server = Some(server);
        }
        if let Some(port) = overrides.dns_port {
            self.resolver.dns_port = port;
        }
        if let Some(timeout) = overrides.timeout_secs {
            self.resolver.timeout_secs = timeout;
        }
        if let Some(retries) = overrides.retries {
            self.resolver.retries = retries;
        }
        if let Some(url) = overrides.doh_url {
            self.resolver.doh_url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let resolver = &self.resolver;

        if resolver.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if resolver.retries == 0 {
            return Err(ConfigError::Validation(
                "retries must be at least 1".to_string(),
            ));
        }

        if resolver.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout_secs must be at least 1".to_string(),
            ));
        }

        if !resolver.doh_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "DoH URL '{}' must use https://",
                resolver.doh_url
            )));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub strategy: Option<ResolutionStrategy>,
    pub dns_server: Option<IpAddr>,
    pub dns_port: Option<u16>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub doh_url: Option<String>,
    pub log_level: Option<String>,
}
