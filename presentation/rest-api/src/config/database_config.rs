use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use persistence::db::{DatabaseConfig, create_postgres_pool, run_migrations};
use sqlx::PgPool;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StorageConfigError {
    #[error("config.unknown_storage_backend: {0}")]
    UnknownBackend(String),
    #[error("config.invalid_number: {name}={value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Where the catalog is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Postgres => "postgres",
            StorageBackend::Memory => "memory",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = StorageConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(StorageConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Storage backend selection
///
/// Environment variables:
/// - STORAGE_BACKEND: "postgres" or "memory" (default: "postgres")
pub fn storage_backend() -> Result<StorageBackend, StorageConfigError> {
    env::var("STORAGE_BACKEND")
        .map(|value| value.parse())
        .unwrap_or(Ok(StorageBackend::Postgres))
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, StorageConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| StorageConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}

/// Build the pool configuration from environment variables
///
/// Environment variables:
/// - DATABASE_URL: PostgreSQL connection string (required)
/// - DATABASE_MAX_CONNECTIONS: pool size (default: 5)
/// - DATABASE_ACQUIRE_TIMEOUT_SECS: wait for a pooled connection (default: 30)
pub fn database_config_from_env() -> anyhow::Result<DatabaseConfig> {
    let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let max_connections = parse_or(
        "DATABASE_MAX_CONNECTIONS",
        env::var("DATABASE_MAX_CONNECTIONS").ok(),
        5u32,
    )?;
    let acquire_timeout_secs = parse_or(
        "DATABASE_ACQUIRE_TIMEOUT_SECS",
        env::var("DATABASE_ACQUIRE_TIMEOUT_SECS").ok(),
        30u64,
    )?;

    Ok(DatabaseConfig::new(db_url)
        .with_max_connections(max_connections)
        .with_acquire_timeout(Duration::from_secs(acquire_timeout_secs)))
}

/// Initialize the database connection pool and apply pending migrations
///
/// Environment variables:
/// - DATABASE_MIGRATIONS_PATH: migrations directory (default: "migrations")
///
/// # Errors
/// Returns error if DATABASE_URL is not set, the connection fails or a
/// migration cannot be applied
pub async fn init_database() -> anyhow::Result<PgPool> {
    let config = database_config_from_env()?;
    let pool = create_postgres_pool(&config)
        .await
        .context("failed to connect to PostgreSQL")?;

    let migrations_path =
        env::var("DATABASE_MIGRATIONS_PATH").unwrap_or_else(|_| "migrations".to_string());
    run_migrations(&pool, &migrations_path)
        .await
        .context("failed to apply database migrations")?;

    Ok(pool)
}
