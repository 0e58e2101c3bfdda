//! Data access for the publication backup log.
//!
//! Everything in here is a single-statement read. The table is owned by an
//! external ingestion process; this service never writes.

pub mod category;
pub mod error;
pub mod pool;
pub mod records;
pub mod util;

pub use category::CategoryResolution;
pub use error::StoreError;
pub use pool::DbPool;
pub use records::{RecordRepository, RecordStore};
