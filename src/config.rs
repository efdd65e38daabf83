//! Server configuration.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! the `PORT` / `DATABASE_URL` environment variables, then CLI flags
//! (applied by `main`). A missing or empty file yields `Config::default()`.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid value {value:?} for environment variable {key}")]
    InvalidEnv { key: &'static str, value: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level server configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
///
/// `Debug` masks any password embedded in `database_url`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Interface to bind.
    pub host: String,

    /// Listening port (`PORT`).
    pub port: u16,

    /// sqlx SQLite URL or plain file path (`DATABASE_URL`).
    pub database_url: String,

    /// Connection pool size.
    pub max_connections: u32,

    /// Insert the sample articles when the table is empty.
    pub seed: bool,

    /// Name reported by the health endpoints.
    pub service_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database_url: "sqlite://blog.db".to_string(),
            max_connections: 5,
            seed: true,
            service_name: "blog-api".to_string(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.redacted_database_url())
            .field("max_connections", &self.max_connections)
            .field("seed", &self.seed)
            .field("service_name", &self.service_name)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "host",
        "port",
        "database_url",
        "max_connections",
        "seed",
        "service_name",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), port = config.port, "Loaded configuration");
        Ok(config)
    }

    /// Apply `PORT` and `DATABASE_URL` from the process environment.
    /// Environment values take precedence over the config file.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::apply_env`] with an injectable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("PORT") {
            self.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { key: "PORT", value })?;
        }

        if let Some(value) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            self.database_url = value;
        }

        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Database URL with any password replaced, safe for logs
    pub fn redacted_database_url(&self) -> String {
        match url::Url::parse(&self.database_url) {
            Ok(mut parsed) if parsed.password().is_some() => {
                if parsed.set_password(Some("[REDACTED]")).is_ok() {
                    parsed.to_string()
                } else {
                    "[REDACTED]".to_string()
                }
            }
            _ => self.database_url.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
