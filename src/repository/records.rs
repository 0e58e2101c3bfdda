//! Read-only access to the backup table.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::models::Record;
use crate::schema::backup;
use crate::with_conn;

use super::category::CategoryResolution;
use super::error::StoreError;
use super::pool::DbPool;

/// What the HTTP layer needs from the store.
///
/// The server is handed an explicitly constructed implementation of this
/// trait instead of reaching for a module-level pool, so tests can swap in
/// an in-memory double.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a single record by id.
    async fn get(&self, id: i64) -> Result<Option<Record>, StoreError>;

    /// List records, newest first.
    async fn list(&self, limit: i64) -> Result<Vec<Record>, StoreError>;

    /// Records published on one exact date, newest time first.
    async fn by_date(&self, fecha: &str) -> Result<Vec<Record>, StoreError>;

    /// Inclusive date range, ordered date descending then time descending.
    async fn by_date_range(&self, desde: &str, hasta: &str) -> Result<Vec<Record>, StoreError>;

    /// Substring match on the title.
    async fn by_title_keyword(&self, keyword: &str) -> Result<Vec<Record>, StoreError>;

    /// Category lookup via the ordered fallback strategies.
    async fn search_by_category(&self, categoria: &str)
        -> Result<CategoryResolution, StoreError>;
}

/// Repository for publication records.
///
/// All operations are single-statement reads with bound parameters; every
/// statement runs under the configured deadline.
#[derive(Clone)]
pub struct RecordRepository {
    pub(super) pool: DbPool,
    pub(super) timeout: Duration,
}

impl RecordRepository {
    pub fn new(pool: DbPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    /// Run a statement under the configured deadline.
    pub(super) async fn run<T>(
        &self,
        fut: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))?
    }

    /// Direct LIKE scan on the category column (the resolver's last resort).
    pub(super) async fn by_category_scan(
        &self,
        categoria: &str,
    ) -> Result<Vec<Record>, StoreError> {
        let pattern = format!("%{categoria}%");
        self.run(async {
            with_conn!(self.pool, conn => {
                Ok(backup::table
                    .filter(backup::categoria.like(pattern.as_str()))
                    .load::<Record>(&mut conn)
                    .await?)
            })
        })
        .await
    }
}

#[async_trait]
impl RecordStore for RecordRepository {
    async fn get(&self, id: i64) -> Result<Option<Record>, StoreError> {
        self.run(async {
            with_conn!(self.pool, conn => {
                Ok(backup::table
                    .filter(backup::id.eq(id))
                    .first::<Record>(&mut conn)
                    .await
                    .optional()?)
            })
        })
        .await
    }

    async fn list(&self, limit: i64) -> Result<Vec<Record>, StoreError> {
        self.run(async {
            with_conn!(self.pool, conn => {
                Ok(backup::table
                    .order((backup::fecha.desc(), backup::hora.desc()))
                    .limit(limit)
                    .load::<Record>(&mut conn)
                    .await?)
            })
        })
        .await
    }

    async fn by_date(&self, fecha: &str) -> Result<Vec<Record>, StoreError> {
        self.run(async {
            with_conn!(self.pool, conn => {
                Ok(backup::table
                    .filter(backup::fecha.eq(fecha))
                    .order(backup::hora.desc())
                    .load::<Record>(&mut conn)
                    .await?)
            })
        })
        .await
    }

    async fn by_date_range(&self, desde: &str, hasta: &str) -> Result<Vec<Record>, StoreError> {
        self.run(async {
            with_conn!(self.pool, conn => {
                Ok(backup::table
                    .filter(backup::fecha.between(desde, hasta))
                    .order((backup::fecha.desc(), backup::hora.desc()))
                    .load::<Record>(&mut conn)
                    .await?)
            })
        })
        .await
    }

    async fn by_title_keyword(&self, keyword: &str) -> Result<Vec<Record>, StoreError> {
        let pattern = format!("%{keyword}%");
        self.run(async {
            with_conn!(self.pool, conn => {
                Ok(backup::table
                    .filter(backup::titulo.like(pattern.as_str()))
                    .load::<Record>(&mut conn)
                    .await?)
            })
        })
        .await
    }

    async fn search_by_category(
        &self,
        categoria: &str,
    ) -> Result<CategoryResolution, StoreError> {
        self.resolve_category(categoria).await
    }
}
