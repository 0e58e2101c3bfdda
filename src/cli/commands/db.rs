//! Database utilities.

use std::path::Path;

use anyhow::Context;
use console::style;
use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::config::Settings;
use crate::display::normalize_date;
use crate::repository::pool::DbPool;
use crate::repository::util::redact_url_password;
use crate::schema::backup;
use crate::with_conn;

/// Verify connectivity and that the backup table answers a trivial query.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("{} Checking database connection", style("→").cyan());
    println!("  URL: {}", redact_url_password(&settings.database_url));

    let pool = DbPool::from_url(&settings.database_url, 1)?;
    println!("  Backend: {}", pool.backend());

    let count: i64 = with_conn!(pool, conn => {
        backup::table
            .select(count_star())
            .first::<i64>(&mut conn)
            .await
    })?;

    println!(
        "  {} Table \"backup\" reachable ({} rows)",
        style("✓").green(),
        count
    );
    Ok(())
}

/// Columns normalized as booleans in export CSVs.
const FLAG_COLUMNS: [&str; 5] = ["YT", "IG", "TT", "TH", "X"];

/// Normalize an export CSV before ingestion.
///
/// Cells are whitespace-trimmed; the FECHA column is rewritten to ISO
/// dates, the platform-flag columns to true/false, and an empty VERSION
/// becomes V1. Ragged rows are padded or truncated to the header width.
pub fn cmd_normalize(input: &Path, output: &Path) -> anyhow::Result<()> {
    println!(
        "{} Normalizing {} -> {}",
        style("→").cyan(),
        input.display(),
        output.display()
    );

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(input)
        .with_context(|| format!("cannot read {}", input.display()))?;
    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("cannot write {}", output.display()))?;

    let mut records = reader.records();
    let header: Vec<String> = match records.next() {
        Some(row) => row?.iter().map(|h| h.trim().to_string()).collect(),
        None => anyhow::bail!("input CSV is empty"),
    };
    writer.write_record(&header)?;

    let mut rows = 0usize;
    for row in records {
        let row = row?;
        let mut cells: Vec<String> = row.iter().map(|c| c.trim().to_string()).collect();
        cells.resize(header.len(), String::new());

        for (idx, cell) in cells.iter_mut().enumerate() {
            *cell = normalize_cell(&header[idx], cell);
        }
        writer.write_record(&cells)?;
        rows += 1;
    }
    writer.flush()?;

    println!("  {} {} rows written", style("✓").green(), rows);
    Ok(())
}

/// Apply the per-column normalizer, leaving unknown columns trimmed only.
fn normalize_cell(column: &str, cell: &str) -> String {
    match column {
        "FECHA" => normalize_date(cell),
        "VERSION" => normalize_version(cell),
        c if FLAG_COLUMNS.contains(&c) => normalize_flag(cell),
        _ => cell.to_string(),
    }
}

/// Map common truthy/falsy spellings to true/false; anything else passes
/// through lowercased-if-recognized, unchanged otherwise.
fn normalize_flag(cell: &str) -> String {
    let v = cell.to_lowercase();
    match v.as_str() {
        "verdadero" | "true" | "t" | "si" | "sí" | "1" | "y" | "yes" => "true".to_string(),
        "falso" | "false" | "f" | "no" | "0" | "n" => "false".to_string(),
        "" => String::new(),
        _ => v,
    }
}

/// An empty version means the first revision.
fn normalize_version(cell: &str) -> String {
    if cell.is_empty() {
        "V1".to_string()
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_flag() {
        assert_eq!(normalize_flag("VERDADERO"), "true");
        assert_eq!(normalize_flag("Sí"), "true");
        assert_eq!(normalize_flag("FALSO"), "false");
        assert_eq!(normalize_flag("0"), "false");
        assert_eq!(normalize_flag(""), "");
        assert_eq!(normalize_flag("Quizás"), "quizás");
    }

    #[test]
    fn test_normalize_version_defaults_to_v1() {
        assert_eq!(normalize_version(""), "V1");
        assert_eq!(normalize_version("V3"), "V3");
    }

    #[test]
    fn test_normalize_cell_routes_by_column() {
        assert_eq!(normalize_cell("FECHA", "25/12/2023"), "2023-12-25");
        assert_eq!(normalize_cell("YT", "VERDADERO"), "true");
        assert_eq!(normalize_cell("VERSION", ""), "V1");
        assert_eq!(normalize_cell("TITULO", "tal cual"), "tal cual");
    }
}
