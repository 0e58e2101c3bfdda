//! Store error taxonomy.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached, or refused the connection.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// The store rejected the statement (missing function, type mismatch, ...).
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// The statement did not complete within the configured deadline.
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Wrap any displayable connection-layer error.
    pub fn connection(e: impl std::fmt::Display) -> Self {
        StoreError::Connection(e.to_string())
    }
}
