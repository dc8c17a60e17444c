use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable that overrides `security.jwt_secret`.
pub const JWT_SECRET_ENV: &str = "SITECMS_JWT_SECRET";

/// Environment variable that overrides `general.database_path`.
pub const DATABASE_ENV: &str = "SITECMS_DATABASE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/sitecms.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Directory uploaded images are written to and served from (`/uploads`).
    pub uploads_path: String,

    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            cors_allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            uploads_path: "uploads".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// HMAC secret used to sign session tokens. Required; the server refuses
    /// to start without it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,

    pub token_ttl_hours: u32,

    /// Argon2 memory cost in KiB
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations)
    pub argon2_time_cost: u32,

    pub argon2_parallelism: u32,

    pub min_password_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: 24,
            argon2_memory_cost_kib: 19 * 1024,
            argon2_time_cost: 2,
            argon2_parallelism: 1,
            min_password_length: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = match paths.iter().find(|p| p.exists()) {
            Some(path) => {
                info!("Loading config from: {}", path.display());
                Self::load_from_path(path)?
            }
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV)
            && !secret.is_empty()
        {
            self.security.jwt_secret = Some(secret);
        }

        if let Ok(db) = std::env::var(DATABASE_ENV)
            && !db.is_empty()
        {
            self.general.database_path = db;
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("sitecms").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".sitecms").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            Ok(true)
        }
    }

    /// Returns the configured signing secret, or an error when none is set.
    pub fn jwt_secret(&self) -> Result<&str> {
        match self.security.jwt_secret.as_deref() {
            Some(secret) if !secret.trim().is_empty() => Ok(secret),
            _ => anyhow::bail!(
                "No token signing secret configured: set security.jwt_secret or {JWT_SECRET_ENV}"
            ),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let secret = self.jwt_secret()?;
        if secret.len() < 32 {
            warn!("Token signing secret is shorter than 32 bytes");
        }

        if self.security.token_ttl_hours == 0 {
            anyhow::bail!("security.token_ttl_hours must be > 0");
        }

        if self.security.min_password_length == 0 {
            anyhow::bail!("security.min_password_length must be > 0");
        }

        argon2::Params::new(
            self.security.argon2_memory_cost_kib,
            self.security.argon2_time_cost,
            self.security.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        if self.server.max_upload_bytes == 0 {
            anyhow::bail!("server.max_upload_bytes must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.security.token_ttl_hours, 24);
        assert_eq!(config.security.min_password_length, 6);
        assert_eq!(config.server.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.security.jwt_secret.is_none());
    }

    #[test]
    fn test_validate_requires_secret() {
        let mut config = Config::default();
        assert!(config.validate().is_err());

        config.security.jwt_secret = Some("   ".to_string());
        assert!(config.validate().is_err());

        config.security.jwt_secret = Some("a-sufficiently-long-test-secret-value".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        let mut config = Config::default();
        config.security.jwt_secret = Some("secret".to_string());
        config.security.token_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_omits_missing_secret() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[security]"));
        assert!(!toml_str.contains("jwt_secret"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security]
            jwt_secret = "from-file"
            token_ttl_hours = 12
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.security.jwt_secret.as_deref(), Some("from-file"));
        assert_eq!(config.security.token_ttl_hours, 12);
        assert_eq!(config.server.port, 3001);
    }
}
