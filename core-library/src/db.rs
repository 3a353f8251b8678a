//! # Song Database
//!
//! Opens the SQLite catalog, applies the embedded schema migrations and
//! verifies the connection before handing out a pool.
//!
//! File databases run in WAL mode so list queries are not blocked by a
//! concurrent insert. Tests use [`create_test_pool`], which gives each caller
//! its own private in-memory database.
//!
//! ```rust,ignore
//! use core_library::db::{create_pool, DatabaseConfig};
//!
//! let pool = create_pool(DatabaseConfig::new("sqlite:songs.db").max_connections(10)).await?;
//! ```

use crate::{LibraryError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Pool settings for the song database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection URL, e.g. `sqlite:songs.db` or `sqlite::memory:`
    pub database_url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    /// How long a request waits for a free connection before failing
    pub acquire_timeout: Duration,
    pub max_lifetime: Option<Duration>,
    pub idle_timeout: Option<Duration>,
    /// Prepared statements cached per connection
    pub statement_cache_capacity: usize,
}

impl DatabaseConfig {
    /// Settings for a database at `database_url`.
    ///
    /// ```rust
    /// use core_library::db::DatabaseConfig;
    ///
    /// let config = DatabaseConfig::new("sqlite:songs.db");
    /// assert_eq!(config.max_connections, 5);
    /// ```
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            idle_timeout: Some(Duration::from_secs(10 * 60)),
            statement_cache_capacity: 100,
        }
    }

    /// A private in-memory database.
    ///
    /// An in-memory database disappears with its last connection, so the
    /// pool keeps exactly one connection open for its whole lifetime.
    pub fn in_memory() -> Self {
        Self {
            max_connections: 1,
            max_lifetime: None,
            idle_timeout: None,
            ..Self::new(IN_MEMORY_URL)
        }
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn max_lifetime(mut self, lifetime: Option<Duration>) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    pub fn idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.statement_cache_capacity = capacity;
        self
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true)
            .statement_cache_capacity(self.statement_cache_capacity);

        Ok(options)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Open the song database, migrate it to the current schema and check that
/// it answers queries.
///
/// # Errors
///
/// - `Database` if the URL is not a SQLite URL, the file cannot be opened or
///   the health check fails
/// - `Migration` if the schema cannot be brought up to date
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool> {
    info!(
        min_connections = config.min_connections,
        max_connections = config.max_connections,
        "Opening song database"
    );

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections)
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(config.connect_options()?)
        .await
        .map_err(|e| {
            warn!(error = %e, "Could not open song database");
            LibraryError::Database(e)
        })?;

    migrate(&pool).await?;
    health_check(&pool).await?;

    info!(connections = pool.size(), "Song database ready");
    Ok(pool)
}

/// Migrated in-memory pool for tests.
pub async fn create_test_pool() -> Result<SqlitePool> {
    create_pool(DatabaseConfig::in_memory()).await
}

async fn migrate(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        warn!(error = %e, "Schema migration failed");
        LibraryError::Migration(e.to_string())
    })?;

    debug!("Schema is up to date");
    Ok(())
}

/// `SELECT 1` against the pool. Backs the `/health` endpoint.
pub async fn health_check(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!(error = %e, "Database health check failed");
        LibraryError::Database(e)
    })?;

    Ok(())
}
