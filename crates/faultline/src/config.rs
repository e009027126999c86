//! Configuration loading and types

use std::path::{Path, PathBuf};

use faultline_core::Messages;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File is not valid TOML for [`Config`]
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration for the faultline daemon
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Route protection and known users
    #[serde(default)]
    pub security: SecurityConfig,
    /// Fixed error response sentences
    #[serde(default)]
    pub messages: Messages,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address and port to bind to
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Log level (trace, debug, info, warn, error), `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log line format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Route protection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Path prefixes reachable without credentials
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,
    /// Path prefix that requires `admin_role`
    #[serde(default = "default_admin_prefix")]
    pub admin_prefix: String,
    /// Role granting access to `admin_prefix`
    #[serde(default = "default_admin_role")]
    pub admin_role: String,
    /// Users accepted by HTTP Basic authentication
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            public_paths: default_public_paths(),
            admin_prefix: default_admin_prefix(),
            admin_role: default_admin_role(),
            users: Vec::new(),
        }
    }
}

/// A user accepted by HTTP Basic authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserConfig {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_public_paths() -> Vec<String> {
    ["/health", "/api-docs", "/scalar"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_admin_prefix() -> String {
    "/admin".to_string()
}

fn default_admin_role() -> String {
    "ADMIN".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from default paths or use defaults
    ///
    /// # Errors
    /// Returns error if a discovered file cannot be read or parsed
    pub fn load_default() -> Result<Self, ConfigError> {
        // Check environment variable
        if let Ok(path) = std::env::var("FAULTLINE_CONFIG") {
            return Self::load(Path::new(&path));
        }

        // Try common paths
        let paths = [
            PathBuf::from("faultline.toml"),
            PathBuf::from("/etc/faultline/faultline.toml"),
            dirs::config_dir()
                .map(|p| p.join("faultline/faultline.toml"))
                .unwrap_or_default(),
        ];

        for path in paths {
            if path.is_file() {
                return Self::load(&path);
            }
        }

        tracing::warn!("no config file found, using defaults");
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.log_format, LogFormat::Pretty);
        assert_eq!(config.security.admin_prefix, "/admin");
        assert_eq!(config.security.admin_role, "ADMIN");
        assert_eq!(config.security.public_paths, ["/health", "/api-docs", "/scalar"]);
        assert!(config.security.users.is_empty());
        assert_eq!(config.messages, Messages::default());
    }

    #[test]
    fn test_full_config() {
        let config: Config = toml::from_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"
            log_format = "json"

            [security]
            public_paths = ["/health"]

            [[security.users]]
            name = "root"
            password = "hunter2"
            roles = ["ADMIN"]

            [messages]
            forbidden = "acceso denegado"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.security.public_paths, ["/health"]);
        assert_eq!(config.security.users[0].roles, ["ADMIN"]);
        assert_eq!(config.messages.forbidden, "acceso denegado");
        assert_eq!(config.messages.conflict, "conflict with current resource state");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/faultline.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
