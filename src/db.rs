pub mod transaction;

use crate::config::AppConfig;
use crate::errors::ServiceError;
use metrics::{counter, gauge, histogram};
use sea_orm::{ConnectOptions, DatabaseConnection, DatabaseTransaction, DbErr};
use sea_orm_migration::MigratorTrait;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub use transaction::{with_transaction, BoxFuture};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Establishes a connection pool to the database with custom configuration
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, ServiceError> {
    debug!("Configuring database connection with: {:?}", config);

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    gauge!("vendor_po_db.max_connections", config.max_connections as f64);
    info!(
        "Connecting to database with max_connections={}",
        config.max_connections
    );

    let pool = sea_orm::Database::connect(opt).await.map_err(|e| {
        error!("Database connection failed: {}", e);
        ServiceError::DatabaseError(e)
    })?;

    info!("Database connection pool established successfully");
    Ok(pool)
}

/// Creates both tables if they are missing
pub async fn run_migrations(pool: &DbPool) -> Result<(), ServiceError> {
    info!("Running database migrations");
    let start = Instant::now();

    let result = crate::migrator::Migrator::up(pool, None)
        .await
        .map_err(ServiceError::DatabaseError);

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => info!("Database migrations completed in {:?}", elapsed),
        Err(e) => error!("Database migrations failed after {:?}: {}", elapsed, e),
    }

    result
}

/// Explicitly owned store handle.
///
/// Opened once at startup (or per test) and passed to the services; closing it shuts
/// the underlying pool down for every clone.
#[derive(Debug, Clone)]
pub struct Database {
    conn: DbPool,
}

impl Database {
    /// Connects using the application config, creating the schema when `auto_migrate` is set
    pub async fn open(cfg: &AppConfig) -> Result<Self, ServiceError> {
        let conn = establish_connection_with_config(&DbConfig::from(cfg)).await?;
        if cfg.auto_migrate {
            run_migrations(&conn).await?;
        }
        Ok(Self { conn })
    }

    /// Disposable single-connection SQLite database with the schema in place
    pub async fn open_in_memory() -> Result<Self, ServiceError> {
        Self::open(&AppConfig::in_memory()).await
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &DbPool {
        &self.conn
    }

    /// Checks if the database connection is active
    pub async fn ping(&self) -> Result<(), ServiceError> {
        let start = Instant::now();
        let result = self.conn.ping().await.map_err(ServiceError::DatabaseError);
        match &result {
            Ok(_) => debug!("Database ping succeeded in {:?}", start.elapsed()),
            Err(e) => {
                error!("Database ping failed: {}", e);
                counter!("vendor_po_db.connection_failures", 1);
            }
        }
        result
    }

    /// Runs a single read against the pool with timing and error accounting
    pub async fn execute<'a, F, Fut, T>(
        &'a self,
        operation: &'static str,
        f: F,
    ) -> Result<T, ServiceError>
    where
        F: FnOnce(&'a DbPool) -> Fut,
        Fut: Future<Output = Result<T, DbErr>>,
    {
        let start = Instant::now();
        debug!(operation = %operation, "Starting database operation");

        let result = f(&self.conn).await.map_err(|e| {
            error!(operation = %operation, error = %e, "Database operation failed");
            counter!("vendor_po_db.operation.error", 1, "operation" => operation);
            ServiceError::DatabaseError(e)
        });

        histogram!("vendor_po_db.operation.duration", start.elapsed(), "operation" => operation);
        result
    }

    /// Runs `f` inside one transaction, committed on `Ok` and rolled back otherwise
    pub async fn transaction<F, T>(&self, operation: &'static str, f: F) -> Result<T, ServiceError>
    where
        F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, ServiceError>>
            + Send,
        T: Send,
    {
        with_transaction(&self.conn, operation, f).await
    }

    /// Closes the pool
    pub async fn close(self) -> Result<(), ServiceError> {
        info!("Closing database connection pool");
        self.conn.close().await.map_err(ServiceError::DatabaseError)
    }
}
