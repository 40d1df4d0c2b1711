//! Server configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server settings.
    pub server: ServerConfig,
    /// Capture-endpoint authentication settings.
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return any errors.
    ///
    /// This checks:
    /// - Server bind address is valid (host:port format)
    /// - Broadcast buffer is non-zero
    /// - A sufficiently long API token is set when auth is enabled
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.server.validate());
        errors.extend(self.security.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load and validate configuration from a file.
    pub fn load_validated<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind: String,
    /// Status broadcast buffer size per observer. If an observer falls
    /// this many updates behind, older updates are dropped for it.
    pub broadcast_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            broadcast_buffer: 100,
        }
    }
}

impl ServerConfig {
    /// Validate server configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.bind.is_empty() {
            errors.push(ValidationError {
                field: "server.bind".to_string(),
                message: "bind address cannot be empty".to_string(),
            });
        } else {
            let parts: Vec<&str> = self.bind.rsplitn(2, ':').collect();
            if parts.len() != 2 {
                errors.push(ValidationError {
                    field: "server.bind".to_string(),
                    message: format!(
                        "invalid bind address '{}': expected format 'host:port'",
                        self.bind
                    ),
                });
            } else {
                let port_str = parts[0];
                match port_str.parse::<u16>() {
                    Ok(0) => {
                        errors.push(ValidationError {
                            field: "server.bind".to_string(),
                            message: "port cannot be 0".to_string(),
                        });
                    }
                    Err(_) => {
                        errors.push(ValidationError {
                            field: "server.bind".to_string(),
                            message: format!(
                                "invalid port '{}': must be a number 1-65535",
                                port_str
                            ),
                        });
                    }
                    Ok(_) => {}
                }
            }
        }

        if self.broadcast_buffer == 0 {
            errors.push(ValidationError {
                field: "server.broadcast_buffer".to_string(),
                message: "broadcast buffer must be at least 1".to_string(),
            });
        }

        errors
    }
}

/// Authentication settings for the capture endpoint.
///
/// Credential verification proper is an external capability; what is
/// configured here is the built-in static-token verifier for deployments
/// that have no identity provider of their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Require a bearer credential on `POST /api/capture`.
    pub auth_enabled: bool,
    /// The accepted static bearer token (min 16 characters).
    pub api_token: Option<String>,
    /// User identity yielded by the static verifier.
    pub user_id: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            auth_enabled: false,
            api_token: None,
            user_id: "operator".to_string(),
        }
    }
}

impl SecurityConfig {
    /// Validate security configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.auth_enabled {
            match &self.api_token {
                None => errors.push(ValidationError {
                    field: "security.api_token".to_string(),
                    message: "api_token is required when auth is enabled".to_string(),
                }),
                Some(token) if token.len() < 16 => errors.push(ValidationError {
                    field: "security.api_token".to_string(),
                    message: "api_token must be at least 16 characters".to_string(),
                }),
                Some(_) => {}
            }
        }

        if self.user_id.is_empty() {
            errors.push(ValidationError {
                field: "security.user_id".to_string(),
                message: "user_id cannot be empty".to_string(),
            });
        }

        errors
    }
}

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Which configuration field failed.
    pub field: String,
    /// Why it failed.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path:?}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the configuration file.
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        /// The file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML error.
        source: toml::de::Error,
    },

    /// The configuration is invalid.
    #[error("invalid configuration: {}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.broadcast_buffer, 100);
        assert!(!config.security.auth_enabled);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            bind = "0.0.0.0:9090"
            broadcast_buffer = 32

            [security]
            auth_enabled = true
            api_token = "a-token-with-16-chars"
            user_id = "clinic-1"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9090");
        assert_eq!(config.server.broadcast_buffer, 32);
        assert_eq!(config.security.user_id, "clinic-1");
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.security.user_id, "operator");
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        let mut config = Config::default();
        config.server.bind = "no-port-here".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.bind"));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = Config::default();
        config.server.bind = "127.0.0.1:0".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_broadcast_buffer_is_rejected() {
        let mut config = Config::default();
        config.server.broadcast_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn auth_enabled_requires_a_long_enough_token() {
        let mut config = Config::default();
        config.security.auth_enabled = true;
        assert!(config.validate().is_err());

        config.security.api_token = Some("short".to_string());
        assert!(config.validate().is_err());

        config.security.api_token = Some("long-enough-token-123".to_string());
        config.validate().unwrap();
    }
}
