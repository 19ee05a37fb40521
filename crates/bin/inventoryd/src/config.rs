//! Daemon configuration: optional `inventory.toml`, then `INVENTORY_*`
//! environment overrides, then validation.

use std::str::FromStr;
use std::time::Duration;

use inventory_adapter_storage_sqlite_sqlx::Config as StorageConfig;
use serde::Deserialize;

const CONFIG_FILE: &str = "inventory.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Where the registration API listens.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Device store settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL, e.g. `sqlite:inventory.db?mode=rwc`.
    pub url: String,
    /// Pool size. Registrations on separate connections are serialised by
    /// the database write lock.
    pub max_connections: u32,
    /// How long a registration waits for the write lock, in milliseconds.
    pub busy_timeout_ms: u64,
}

/// Logging settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load `inventory.toml` (if present) and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    ///
    /// Values that fail to parse are ignored. `RUST_LOG` wins over
    /// `INVENTORY_LOG`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let parsed = |key: &str| lookup(key).and_then(|val| parse_var(&val));

        if let Some((host, port)) = lookup("INVENTORY_BIND")
            .as_deref()
            .and_then(|bind| bind.rsplit_once(':'))
        {
            self.server.host = host.to_string();
            if let Some(port) = parse_var(port) {
                self.server.port = port;
            }
        }
        if let Some(host) = lookup("INVENTORY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parsed("INVENTORY_PORT") {
            self.server.port = port;
        }
        if let Some(url) = lookup("INVENTORY_DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(max) =
            lookup("INVENTORY_DATABASE_MAX_CONNECTIONS").and_then(|val| parse_var(&val))
        {
            self.database.max_connections = max;
        }
        if let Some(filter) = lookup("RUST_LOG").or_else(|| lookup("INVENTORY_LOG")) {
            self.logging.filter = filter;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database.max_connections must be non-zero".to_string(),
            ));
        }
        // Each connection to an in-memory database sees its own empty store.
        if self.database.is_in_memory() && self.database.max_connections > 1 {
            return Err(ConfigError::Validation(
                "an in-memory database requires database.max_connections = 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl DatabaseConfig {
    fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

impl From<&DatabaseConfig> for StorageConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            database_url: config.url.clone(),
            max_connections: config.max_connections,
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        }
    }
}

fn parse_var<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:inventory.db?mode=rwc".to_string(),
            max_connections: 5,
            busy_timeout_ms: 5_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "inventoryd=info,inventory=info,tower_http=debug".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse inventory.toml")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read inventory.toml")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}
