//! Display normalization for records.
//!
//! The backup table has been through several schema revisions, so rows can
//! carry the same information under different field names and casings
//! (`fecha` vs `FECHA` vs `fecha_publicacion`) and platform flags as any of
//! VERDADERO/true/sí/no/false. These helpers normalize values for display
//! and never fail: anything unrecognized passes through unchanged.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

/// Field names that may carry the publication date, in priority order.
pub const DATE_FIELDS: [&str; 5] = [
    "fecha_publicacion",
    "fecha",
    "FECHA",
    "Fecha",
    "fecha_publicada",
];

static DMY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})[/\-](\d{2})[/\-](\d{4})$").unwrap());
static YMD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})[/\-](\d{2})[/\-](\d{2})$").unwrap());

/// Normalize a boolean-ish platform flag for display.
///
/// Case-insensitive: verdadero/true/si/sí map to `Sí`, no/false to `No`.
/// Null becomes the empty string; anything else comes back unchanged.
pub fn format_flag(value: &Value) -> String {
    if value.is_null() {
        return String::new();
    }
    let raw = value_to_string(value);
    match raw.trim().to_lowercase().as_str() {
        "verdadero" | "true" | "si" | "sí" => "Sí".to_string(),
        "no" | "false" => "No".to_string(),
        _ => raw,
    }
}

/// First non-empty value among the given aliased field names.
pub fn field_alias<'a>(record: &'a Value, names: &[&str]) -> Option<&'a Value> {
    let obj = record.as_object()?;
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find(|v| !v.is_null() && !matches!(v, Value::String(s) if s.is_empty()))
}

/// Publication date of a record as ISO `YYYY-MM-DD`.
///
/// Checks the aliased date fields in priority order; falls back to the raw
/// string when no pattern matches, and to the empty string when no field is
/// present at all.
pub fn display_date(record: &Value) -> String {
    match field_alias(record, &DATE_FIELDS) {
        Some(raw) => normalize_date(&value_to_string(raw)),
        None => String::new(),
    }
}

/// Normalize one date string to ISO `YYYY-MM-DD`.
///
/// Tries `DD/MM/YYYY` and `DD-MM-YYYY`, then `YYYY-MM-DD` and `YYYY/MM/DD`,
/// then a few generic calendar parses. Unparseable input is returned as-is.
pub fn normalize_date(raw: &str) -> String {
    let s = raw.trim();
    if s.is_empty() {
        return String::new();
    }

    if let Some(c) = DMY.captures(s) {
        return format!("{}-{}-{}", &c[3], &c[2], &c[1]);
    }
    if let Some(c) = YMD.captures(s) {
        return format!("{}-{}-{}", &c[1], &c[2], &c[3]);
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%d.%m.%Y") {
        return d.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return dt.date().format("%Y-%m-%d").to_string();
    }

    s.to_string()
}

fn value_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
