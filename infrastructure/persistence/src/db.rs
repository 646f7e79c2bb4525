use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{path::Path, time::Duration};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database.connection_error")]
    ConnectionError(#[source] sqlx::Error),
    #[error("database.migrations_not_found: {0}")]
    MigrationsNotFound(String),
    #[error("database.migration_error")]
    MigrationError(#[source] sqlx::migrate::MigrateError),
}

/// Configuration for the database connection
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connection_string: String,
    pub max_connections: u32,
    /// Upper bound on waiting for a pooled connection. Exceeding it surfaces as
    /// an internal error from the repository.
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Creates a new database configuration with default values
    pub fn new(connection_string: String) -> Self {
        Self {
            connection_string,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_acquire_timeout(mut self, acquire_timeout: Duration) -> Self {
        self.acquire_timeout = acquire_timeout;
        self
    }
}

/// Creates a PostgreSQL connection pool
pub async fn create_postgres_pool(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    tracing::info!(
        max_connections = config.max_connections,
        acquire_timeout_secs = config.acquire_timeout.as_secs(),
        "Connecting to PostgreSQL"
    );

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.connection_string)
        .await
        .map_err(DatabaseError::ConnectionError)
}

/// Runs database migrations from the specified directory
pub async fn run_migrations(pool: &PgPool, migrations_path: &str) -> Result<(), DatabaseError> {
    let path = Path::new(migrations_path);

    if !path.exists() {
        return Err(DatabaseError::MigrationsNotFound(migrations_path.to_string()));
    }

    let migrator = sqlx::migrate::Migrator::new(path)
        .await
        .map_err(DatabaseError::MigrationError)?;
    migrator
        .run(pool)
        .await
        .map_err(DatabaseError::MigrationError)?;

    tracing::info!(path = migrations_path, "Database migrations applied");
    Ok(())
}
