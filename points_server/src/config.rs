//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus exporter address; no exporter when unset
    pub metrics_bind: Option<SocketAddr>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `metrics_bind_override` - Optional metrics address override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but can not be parsed
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(addr) => addr,
            None => parse_env_addr("SERVER_BIND")?.unwrap_or_else(default_bind),
        };

        let metrics_bind = match metrics_bind_override {
            Some(addr) => Some(addr),
            None => parse_env_addr("METRICS_BIND")?,
        };

        Ok(ServerConfig { bind, metrics_bind })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            metrics_bind: None,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

/// Read a socket address from the environment; unset or empty is `None`
fn parse_env_addr(key: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => parse_addr(key, &raw).map(Some),
        _ => Ok(None),
    }
}

fn parse_addr(key: &str, raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("'{raw}' is not an IP:PORT address"),
    })
}
