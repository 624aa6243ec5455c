/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration and
 * opening the SQLite pool.
 *
 * # Configuration Sources
 *
 * Configuration is read from environment variables (a `.env` file is
 * loaded by the binary first), with defaults suitable for local
 * development:
 *
 * | Variable                   | Default                          |
 * |----------------------------|----------------------------------|
 * | `DATABASE_URL`             | `sqlite://carebridge.db?mode=rwc`|
 * | `DATABASE_MAX_CONNECTIONS` | `5`                              |
 * | `JWT_SECRET`               | development secret (warns)       |
 * | `JWT_TTL_HOURS`            | `720` (30 days)                  |
 * | `BCRYPT_COST`              | `12`                             |
 * | `SERVER_HOST`              | `0.0.0.0`                        |
 * | `SERVER_PORT`              | `5000`                           |
 * | `CORS_ORIGINS`             | `*`                              |
 * | `LOG_FORMAT`               | `pretty` (`json` for JSON lines) |
 *
 * # Migrations
 *
 * `connect_database` applies the embedded migrations before returning the
 * pool, so the server never runs against an outdated schema.
 */

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;

/// Secret used when `JWT_SECRET` is not set. Development only.
pub const DEV_JWT_SECRET: &str = "carebridge-dev-secret-change-me";

const DEFAULT_DATABASE_URL: &str = "sqlite://carebridge.db?mode=rwc";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" | "" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ConfigError::InvalidValue {
                name: "LOG_FORMAT",
                value: other.to_string(),
            }),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection string
    pub database_url: String,
    /// Pool size
    pub max_connections: u32,
    /// HMAC secret for access tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_ttl_hours: i64,
    /// bcrypt work factor (4..=31)
    pub bcrypt_cost: u32,
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl_hours: 24 * 30,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec!["*".to_string()],
            log_format: LogFormat::Pretty,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = AppConfig::builder();

        if let Some(url) = lookup("DATABASE_URL") {
            builder = builder.database_url(url);
        }
        if let Some(value) = lookup("DATABASE_MAX_CONNECTIONS") {
            builder = builder.max_connections(parse_var("DATABASE_MAX_CONNECTIONS", &value)?);
        }
        match lookup("JWT_SECRET") {
            Some(secret) => builder = builder.jwt_secret(secret),
            None => tracing::warn!("JWT_SECRET not set, using the development secret"),
        }
        if let Some(value) = lookup("JWT_TTL_HOURS") {
            builder = builder.jwt_ttl_hours(parse_var("JWT_TTL_HOURS", &value)?);
        }
        if let Some(value) = lookup("BCRYPT_COST") {
            builder = builder.bcrypt_cost(parse_var("BCRYPT_COST", &value)?);
        }
        if let Some(host) = lookup("SERVER_HOST") {
            builder = builder.host(host);
        }
        if let Some(value) = lookup("SERVER_PORT") {
            builder = builder.port(parse_var("SERVER_PORT", &value)?);
        }
        if let Some(value) = lookup("CORS_ORIGINS") {
            builder = builder.cors_origins(
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }
        if let Some(value) = lookup("LOG_FORMAT") {
            builder = builder.log_format(value.parse()?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("DATABASE_URL"));
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SERVER_PORT",
                value: "0".to_string(),
            });
        }
        if self.jwt_ttl_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "JWT_TTL_HOURS",
                value: self.jwt_ttl_hours.to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                value: self.bcrypt_cost.to_string(),
            });
        }
        Ok(())
    }

    /// Address the server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: "SERVER_HOST",
                value: self.host.clone(),
            })
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    database_url: Option<String>,
    max_connections: Option<u32>,
    jwt_secret: Option<String>,
    jwt_ttl_hours: Option<i64>,
    bcrypt_cost: Option<u32>,
    host: Option<String>,
    port: Option<u16>,
    cors_origins: Option<Vec<String>>,
    log_format: Option<LogFormat>,
}

impl AppConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn jwt_ttl_hours(mut self, hours: i64) -> Self {
        self.jwt_ttl_hours = Some(hours);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    pub fn log_format(mut self, format: LogFormat) -> Self {
        self.log_format = Some(format);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            database_url: self.database_url.unwrap_or(defaults.database_url),
            max_connections: self.max_connections.unwrap_or(defaults.max_connections),
            jwt_secret: self.jwt_secret.unwrap_or(defaults.jwt_secret),
            jwt_ttl_hours: self.jwt_ttl_hours.unwrap_or(defaults.jwt_ttl_hours),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(defaults.bcrypt_cost),
            host: self.host.unwrap_or(defaults.host),
            port: self.port.unwrap_or(defaults.port),
            cors_origins: self.cors_origins.unwrap_or(defaults.cors_origins),
            log_format: self.log_format.unwrap_or(defaults.log_format),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

fn parse_var<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

/// Open the SQLite pool and apply migrations
///
/// Foreign keys are enforced on every connection.
pub async fn connect_database(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!(url = %config.database_url, "Connecting to database");

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Apply embedded migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!().run(pool).await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}
