use std::env;
use std::time::Duration;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub greeting: String,
    pub request_timeout: Duration,
    pub log_level: String,
    pub database: DatabaseConfig,
    pub environment: Environment,
}

/// Connection settings for the `users` store.
/// Every field has a default so the service starts against the stock compose setup.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    pub charset: String,
    pub ssl_mode: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

/// Reads `key` through `lookup`, falling back to `default` when unset.
fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    /// `from_env` passes `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var_or(&lookup, "PORT", "8080")
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let greeting = var_or(&lookup, "GREETING", "mars");

        let request_timeout_secs = var_or(&lookup, "REQUEST_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a valid number of seconds")?;

        let log_level = var_or(&lookup, "LOG_LEVEL", "debug");

        let database = DatabaseConfig::from_lookup(&lookup)?;

        let environment = match var_or(&lookup, "APP_ENV", "local").as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Local,
        };

        let config = Config {
            port,
            greeting,
            request_timeout: Duration::from_secs(request_timeout_secs),
            log_level,
            database,
            environment,
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        if self.request_timeout.as_secs() == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL cannot be empty");
        }

        self.database.validate()
    }
}

impl DatabaseConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var_or(lookup, "DB_PORT", "5432")
            .parse::<u16>()
            .context("DB_PORT must be a valid port number")?;

        let max_connections = var_or(lookup, "DB_MAX_CONNECTIONS", "10")
            .parse::<u32>()
            .context("DB_MAX_CONNECTIONS must be a valid number")?;

        let connection_timeout_secs = var_or(lookup, "DB_CONNECTION_TIMEOUT", "30")
            .parse::<u64>()
            .context("DB_CONNECTION_TIMEOUT must be a valid number of seconds")?;

        Ok(DatabaseConfig {
            host: var_or(lookup, "DB_HOST", "database"),
            port,
            database: var_or(lookup, "DB_NAME", "characters"),
            username: var_or(lookup, "DB_USER", "root"),
            password: var_or(lookup, "DB_PASSWORD", "root"),
            charset: var_or(lookup, "DB_CHARSET", "UTF8"),
            ssl_mode: var_or(lookup, "DB_SSL_MODE", "prefer"),
            max_connections,
            connection_timeout: Duration::from_secs(connection_timeout_secs),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            anyhow::bail!("Database host cannot be empty");
        }

        if self.port == 0 {
            anyhow::bail!("Database port must be greater than 0");
        }

        if self.database.trim().is_empty() {
            anyhow::bail!("Database name cannot be empty");
        }

        if self.username.trim().is_empty() {
            anyhow::bail!("Database username cannot be empty");
        }

        // Sent verbatim as a server option, so keep it to a plain encoding name
        if self.charset.is_empty()
            || !self.charset.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            anyhow::bail!("Invalid charset '{}'", self.charset);
        }

        match self.ssl_mode.as_str() {
            "disable" | "prefer" | "require" => {},
            _ => anyhow::bail!("Invalid SSL mode. Must be one of: disable, prefer, require"),
        }

        if self.max_connections == 0 {
            anyhow::bail!("Max connections must be greater than 0");
        }

        if self.connection_timeout.as_secs() == 0 {
            anyhow::bail!("Connection timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}
