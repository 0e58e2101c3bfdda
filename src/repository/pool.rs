//! Unified database connection pool supporting PostgreSQL and MySQL.
//!
//! This module provides a backend-agnostic interface for database
//! connections. The actual backend is determined at runtime from the
//! database URL; the two are never active at the same time. Placeholder
//! syntax (`$1` vs `?`) stays behind this boundary - call sites only ever
//! see the Diesel DSL or a repository method.

use diesel_async::pooled_connection::deadpool::Pool as DeadPool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
#[cfg(feature = "mysql")]
use diesel_async::AsyncMysqlConnection;
use diesel_async::AsyncPgConnection;

use super::error::StoreError;

/// Default number of pooled connections per process.
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Pooled PostgreSQL connection.
pub type PgConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

/// Pooled MySQL connection.
#[cfg(feature = "mysql")]
pub type MysqlConn = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncMysqlConnection>>;

/// PostgreSQL connection pool.
///
/// Connections are created lazily; building the pool never touches the
/// network. Callers queue when the pool is exhausted rather than failing.
#[derive(Clone)]
pub struct PgPool {
    pool: DeadPool<AsyncPgConnection>,
}

impl PgPool {
    /// Create a new PostgreSQL pool.
    pub fn new(database_url: &str, max_size: usize) -> Result<Self, StoreError> {
        let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = DeadPool::builder(config)
            .max_size(max_size)
            .build()
            .map_err(StoreError::connection)?;
        Ok(Self { pool })
    }

    /// Get a connection.
    pub async fn get(&self) -> Result<PgConn, StoreError> {
        self.pool.get().await.map_err(StoreError::connection)
    }
}

/// MySQL connection pool.
#[cfg(feature = "mysql")]
#[derive(Clone)]
pub struct MysqlPool {
    pool: DeadPool<AsyncMysqlConnection>,
}

#[cfg(feature = "mysql")]
impl MysqlPool {
    /// Create a new MySQL pool.
    pub fn new(database_url: &str, max_size: usize) -> Result<Self, StoreError> {
        let config = AsyncDieselConnectionManager::<AsyncMysqlConnection>::new(database_url);
        let pool = DeadPool::builder(config)
            .max_size(max_size)
            .build()
            .map_err(StoreError::connection)?;
        Ok(Self { pool })
    }

    /// Get a connection.
    pub async fn get(&self) -> Result<MysqlConn, StoreError> {
        self.pool.get().await.map_err(StoreError::connection)
    }
}

/// Unified database pool that supports both PostgreSQL and MySQL.
#[derive(Clone)]
pub enum DbPool {
    Postgres(PgPool),
    #[cfg(feature = "mysql")]
    Mysql(MysqlPool),
}

impl DbPool {
    /// Create a pool from a database URL.
    ///
    /// Detects the backend from the URL:
    /// - `postgres://` or `postgresql://` -> PostgreSQL
    /// - `mysql://` -> MySQL (requires the `mysql` feature)
    pub fn from_url(url: &str, max_size: usize) -> Result<Self, StoreError> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return Ok(DbPool::Postgres(PgPool::new(url, max_size)?));
        }

        if url.starts_with("mysql://") {
            #[cfg(feature = "mysql")]
            return Ok(DbPool::Mysql(MysqlPool::new(url, max_size)?));

            #[cfg(not(feature = "mysql"))]
            return Err(StoreError::Connection(
                "mysql:// URLs need a build with the `mysql` feature".to_string(),
            ));
        }

        Err(StoreError::Connection(format!(
            "unsupported database URL (expected postgres:// or mysql://): {url}"
        )))
    }

    /// Check if this is a PostgreSQL backend.
    pub fn is_postgres(&self) -> bool {
        matches!(self, DbPool::Postgres(_))
    }

    /// Check if this is a MySQL backend.
    #[cfg(feature = "mysql")]
    pub fn is_mysql(&self) -> bool {
        matches!(self, DbPool::Mysql(_))
    }

    /// Name of the active backend, for logs.
    pub fn backend(&self) -> &'static str {
        match self {
            DbPool::Postgres(_) => "postgres",
            #[cfg(feature = "mysql")]
            DbPool::Mysql(_) => "mysql",
        }
    }
}

/// Macro for running the same Diesel DSL on either backend.
///
/// # Example
/// ```ignore
/// with_conn!(self.pool, conn => {
///     Ok(backup::table.load::<Record>(&mut conn).await?)
/// })
/// ```
#[macro_export]
macro_rules! with_conn {
    ($pool:expr, $conn:ident => $body:expr) => {{
        match &$pool {
            $crate::repository::pool::DbPool::Postgres(pool) => {
                let mut $conn = pool.get().await?;
                $body
            }
            #[cfg(feature = "mysql")]
            $crate::repository::pool::DbPool::Mysql(pool) => {
                let mut $conn = pool.get().await?;
                $body
            }
        }
    }};
}

#[allow(unused_imports)]
pub use with_conn;
