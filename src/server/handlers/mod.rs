//! HTTP handlers.

mod api;
mod browse;
mod dates;

pub use api::{
    get_record, legacy_redirect, list_records, search_by_category, search_by_date,
    search_by_keyword,
};
pub use browse::browse_records;
pub use dates::search_by_date_range;
