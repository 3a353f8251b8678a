//! # Core Configuration Module
//!
//! Provides configuration management for the song library service.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance holding every setting the service needs at startup. The builder
//! validates eagerly so a misconfigured deployment fails before the HTTP
//! listener is bound.
//!
//! ## Usage
//!
//! ### Explicit configuration
//!
//! ```
//! use core_runtime::config::{CoreConfig, Environment};
//!
//! let config = CoreConfig::builder()
//!     .environment(Environment::Dev)
//!     .database_url("sqlite:songs.db")
//!     .http_port(8080)
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.http_port, 8080);
//! ```
//!
//! ### From the process environment
//!
//! ```ignore
//! let config = CoreConfig::from_env()?;
//! ```
//!
//! `from_env` first loads a `.env` file from the working directory when one
//! exists, then reads:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `ENV` | `local`, `dev` or `prod` | `local` |
//! | `DB_URL` | sqlx connection URL | `sqlite:songs.db` |
//! | `HTTP_HOST` | bind address | `0.0.0.0` |
//! | `HTTP_PORT` | bind port | `8080` |
//! | `DB_MAX_CONNECTIONS` | pool size | `5` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | pool checkout timeout | `30` |
//! | `TRACK_INFO_URL` | base URL of the track-info lookup service | unset |

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default database URL used when none is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:songs.db";

/// Default HTTP port.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Deployment environment. Drives logging defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Local,
    Dev,
    Prod,
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "dev" => Ok(Self::Dev),
            "prod" => Ok(Self::Prod),
            other => Err(Error::Config(format!(
                "Unknown environment '{}': expected one of local, dev, prod",
                other
            ))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Prod => "prod",
        };
        f.write_str(name)
    }
}

/// Core configuration for the song library service.
///
/// Use [`CoreConfigBuilder`] (or [`CoreConfig::from_env`]) to construct
/// instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Deployment environment
    pub environment: Environment,

    /// sqlx connection URL for the song store
    pub database_url: String,

    /// Address the HTTP server binds to
    pub http_host: String,

    /// Port the HTTP server binds to
    pub http_port: u16,

    /// Maximum number of pooled database connections
    pub max_connections: u32,

    /// Maximum time to wait for a pooled connection
    pub acquire_timeout: Duration,

    /// Base URL of the external track-info lookup (release date, link).
    /// Enrichment is disabled when unset.
    pub track_info_url: Option<String>,
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Load configuration from `.env` (if present) and the process environment.
    ///
    /// A missing `.env` file is not an error; a malformed one is.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(Error::Config(format!("Failed to load .env file: {}", e))),
        }

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Used by [`from_env`](Self::from_env); exposed so callers can feed
    /// configuration from other sources.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mut builder = Self::builder();

        if let Some(env) = read("ENV") {
            builder = builder.environment(env.parse()?);
        }
        if let Some(url) = read("DB_URL") {
            builder = builder.database_url(url);
        }
        if let Some(host) = read("HTTP_HOST") {
            builder = builder.http_host(host);
        }
        if let Some(port) = read("HTTP_PORT") {
            builder = builder.http_port(parse_number("HTTP_PORT", &port)?);
        }
        if let Some(max) = read("DB_MAX_CONNECTIONS") {
            builder = builder.max_connections(parse_number("DB_MAX_CONNECTIONS", &max)?);
        }
        if let Some(secs) = read("DB_ACQUIRE_TIMEOUT_SECS") {
            let secs: u64 = parse_number("DB_ACQUIRE_TIMEOUT_SECS", &secs)?;
            builder = builder.acquire_timeout(Duration::from_secs(secs));
        }
        if let Some(url) = read("TRACK_INFO_URL") {
            builder = builder.track_info_url(url);
        }

        builder.build()
    }

    /// Socket address string the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Database URL is not empty
    /// - HTTP port is not 0
    /// - Pool size is between 1 and 100
    /// - Track-info URL, when set, is an http(s) URL
    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::Config("Database URL cannot be empty".to_string()));
        }

        if self.http_host.trim().is_empty() {
            return Err(Error::Config("HTTP host cannot be empty".to_string()));
        }

        if self.http_port == 0 {
            return Err(Error::Config("HTTP port must be greater than 0".to_string()));
        }

        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(Error::Config(format!(
                "Database pool size must be between 1 and 100, got {}",
                self.max_connections
            )));
        }

        if self.acquire_timeout.is_zero() {
            return Err(Error::Config(
                "Database acquire timeout must be greater than 0".to_string(),
            ));
        }

        if let Some(ref url) = self.track_info_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "Track info URL must start with http:// or https://, got '{}'",
                    url
                )));
            }
        }

        Ok(())
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a number, got '{}'", key, value)))
}

/// Builder for constructing [`CoreConfig`] instances.
///
/// Every field has a default; [`build()`](CoreConfigBuilder::build) validates
/// the result.
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    environment: Option<Environment>,
    database_url: Option<String>,
    http_host: Option<String>,
    http_port: Option<u16>,
    max_connections: Option<u32>,
    acquire_timeout: Option<Duration>,
    track_info_url: Option<String>,
}

impl CoreConfigBuilder {
    /// Sets the deployment environment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Sets the database URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .database_url("sqlite:/var/lib/songs/songs.db");
    /// ```
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Sets the HTTP bind host.
    pub fn http_host(mut self, host: impl Into<String>) -> Self {
        self.http_host = Some(host.into());
        self
    }

    /// Sets the HTTP bind port.
    pub fn http_port(mut self, port: u16) -> Self {
        self.http_port = Some(port);
        self
    }

    /// Sets the maximum pool size.
    ///
    /// Default: 5
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Sets the pool acquire timeout.
    ///
    /// Default: 30 seconds
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Enables track-info enrichment against the given base URL.
    pub fn track_info_url(mut self, url: impl Into<String>) -> Self {
        self.track_info_url = Some(url.into());
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when validation fails.
    pub fn build(self) -> Result<CoreConfig> {
        let config = CoreConfig {
            environment: self.environment.unwrap_or_default(),
            database_url: self
                .database_url
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            http_host: self.http_host.unwrap_or_else(|| "0.0.0.0".to_string()),
            http_port: self.http_port.unwrap_or(DEFAULT_HTTP_PORT),
            max_connections: self.max_connections.unwrap_or(5),
            acquire_timeout: self.acquire_timeout.unwrap_or(Duration::from_secs(30)),
            track_info_url: self
                .track_info_url
                .map(|url| url.trim_end_matches('/').to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_builder_defaults() {
        let config = CoreConfig::builder().build().unwrap();

        assert_eq!(config.environment, Environment::Local);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout, Duration::from_secs(30));
        assert!(config.track_info_url.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_builder_rejects_empty_database_url() {
        let result = CoreConfig::builder().database_url("  ").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_zero_port() {
        let result = CoreConfig::builder().http_port(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_rejects_pool_size_out_of_range() {
        assert!(CoreConfig::builder().max_connections(0).build().is_err());
        assert!(CoreConfig::builder().max_connections(101).build().is_err());
        assert!(CoreConfig::builder().max_connections(100).build().is_ok());
    }

    #[test]
    fn test_builder_rejects_non_http_track_info_url() {
        let result = CoreConfig::builder()
            .track_info_url("ftp://example.com")
            .build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_track_info_url_trailing_slash_trimmed() {
        let config = CoreConfig::builder()
            .track_info_url("https://info.example.com/")
            .build()
            .unwrap();
        assert_eq!(
            config.track_info_url.as_deref(),
            Some("https://info.example.com")
        );
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("local".parse::<Environment>().unwrap(), Environment::Local);
        assert_eq!(" DEV ".parse::<Environment>().unwrap(), Environment::Dev);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Prod);
        assert!("staging".parse::<Environment>().is_err());
        assert_eq!(Environment::Prod.to_string(), "prod");
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = CoreConfig::from_lookup(lookup_from(&[
            ("ENV", "prod"),
            ("DB_URL", "sqlite::memory:"),
            ("HTTP_HOST", "127.0.0.1"),
            ("HTTP_PORT", "9000"),
            ("DB_MAX_CONNECTIONS", "8"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "5"),
            ("TRACK_INFO_URL", "http://localhost:7000"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Prod);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.max_connections, 8);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
        assert_eq!(
            config.track_info_url.as_deref(),
            Some("http://localhost:7000")
        );
    }

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let config = CoreConfig::from_lookup(lookup_from(&[("DB_URL", ""), ("HTTP_PORT", " ")]))
            .unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
    }

    #[test]
    fn test_from_lookup_rejects_bad_port() {
        let result = CoreConfig::from_lookup(lookup_from(&[("HTTP_PORT", "eighty")]));
        match result {
            Err(Error::Config(message)) => assert!(message.contains("HTTP_PORT")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
