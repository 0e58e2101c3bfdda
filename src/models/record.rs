//! The publication record row.

use diesel::prelude::*;
use serde::Serialize;

use crate::schema::backup;

/// One row of the backup table.
///
/// Only `id` is guaranteed present; every other column has been nullable in
/// at least one historical schema revision and must be tolerated as absent.
#[derive(Queryable, QueryableByName, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = backup)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Record {
    pub id: i64,
    /// Publication date as ISO `YYYY-MM-DD` text.
    pub fecha: Option<String>,
    /// Publication time.
    pub hora: Option<String>,
    pub titulo: Option<String>,
    pub editor: Option<String>,
    pub categoria: Option<String>,
    pub formato: Option<String>,
    pub version: Option<String>,
    // Platform-presence flags, stored as free text (VERDADERO/true/sí/...).
    pub yt: Option<String>,
    pub ig: Option<String>,
    pub tt: Option<String>,
    pub th: Option<String>,
    pub x: Option<String>,
    pub link: Option<String>,
}
