//! Configuration loading

use anyhow::{Context, Result};
use credgate_auth::HashParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use uuid::Uuid;

/// Publicly known placeholder secret, refused at startup
const PLACEHOLDER_JWT_SECRET: &str = "change-me-in-production";

/// Shortest signing secret accepted without a warning (HS256 key size)
const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime (one year)
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

/// Credential store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// "sqlite" or "memory"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Empty means a random secret is generated at startup
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
    #[serde(default)]
    pub argon2: HashParams,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: default_token_ttl_hours(),
            argon2: HashParams::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_backend() -> String {
    "sqlite".to_string()
}

fn default_db_path() -> String {
    "./data/credgate.db".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }

    /// Reject unusable values and warn about unsafe ones
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_TOKEN_TTL_HOURS).contains(&self.auth.token_ttl_hours) {
            anyhow::bail!(
                "auth.token_ttl_hours must be between 1 and {}, got {}",
                MAX_TOKEN_TTL_HOURS,
                self.auth.token_ttl_hours
            );
        }
        if self.auth.jwt_secret == PLACEHOLDER_JWT_SECRET {
            anyhow::bail!("auth.jwt_secret is the public placeholder; set a real secret");
        }
        if !matches!(self.database.backend.as_str(), "sqlite" | "memory") {
            anyhow::bail!(
                "database.backend must be \"sqlite\" or \"memory\", got \"{}\"",
                self.database.backend
            );
        }

        if !self.auth.jwt_secret.is_empty() && self.auth.jwt_secret.len() < MIN_SECRET_LENGTH {
            warn!(
                "auth.jwt_secret is shorter than {} bytes",
                MIN_SECRET_LENGTH
            );
        }
        if self.database.backend == "memory" {
            warn!("Using in-memory credential store; accounts are lost on restart");
        }
        Ok(())
    }

    /// Fill in a random per-process signing secret when none is configured.
    /// Returns true if a secret was generated.
    pub fn ensure_jwt_secret(&mut self) -> bool {
        if !self.auth.jwt_secret.is_empty() {
            return false;
        }
        self.auth.jwt_secret = format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        );
        warn!("auth.jwt_secret is not set; using a random secret, tokens will not survive a restart");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path.display().to_string())
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/credgate.toml").unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.backend, "sqlite");
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert_eq!(config.auth.argon2, HashParams::default());
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_file() {
        let (_dir, path) = write_config(
            r#"
            [server]
            port = 8080

            [auth]
            jwt_secret = "0123456789abcdef0123456789abcdef"

            [auth.argon2]
            memory_kib = 65536
            "#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret, "0123456789abcdef0123456789abcdef");
        assert_eq!(config.auth.argon2.memory_kib, 65536);
        assert_eq!(config.auth.argon2.iterations, 2);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let (_dir, path) = write_config("[server\nport = ");
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.auth.token_ttl_hours = 0;
        assert!(config.validate().is_err());
        config.auth.token_ttl_hours = i64::MAX;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.backend = "postgres".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.auth.jwt_secret = PLACEHOLDER_JWT_SECRET.to_string();
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_shipped_config_gets_private_secret() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/default.toml");
        let mut config = Config::load(path).unwrap();
        config.validate().unwrap();

        assert!(config.ensure_jwt_secret());
        assert_ne!(config.auth.jwt_secret, PLACEHOLDER_JWT_SECRET);
        assert!(config.auth.jwt_secret.len() >= MIN_SECRET_LENGTH);

        let mut other = Config::default();
        other.ensure_jwt_secret();
        assert_ne!(config.auth.jwt_secret, other.auth.jwt_secret);
    }

    #[test]
    fn test_configured_secret_is_kept() {
        let mut config = Config::default();
        config.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();

        assert!(!config.ensure_jwt_secret());
        assert_eq!(config.auth.jwt_secret, "0123456789abcdef0123456789abcdef");
    }
}
