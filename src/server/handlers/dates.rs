//! Date-range search and CSV download.

use std::sync::LazyLock;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;

use super::super::csv::records_to_csv;
use super::super::error::ApiError;
use super::super::AppState;

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Shape check only: `2023-13-99` passes and is left for the store to
/// reject.
pub(super) fn is_valid_date(s: &str) -> bool {
    DATE_RE.is_match(s)
}

/// Query parameters for the date-range search.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub desde: Option<String>,
    pub hasta: Option<String>,
    pub format: Option<String>,
}

/// Inclusive date-range search, optionally serialized as a CSV attachment.
pub async fn search_by_date_range(
    State(state): State<AppState>,
    Query(params): Query<RangeParams>,
) -> Result<Response, ApiError> {
    let (Some(desde), Some(hasta)) = (params.desde.as_deref(), params.hasta.as_deref()) else {
        return Err(ApiError::Validation(
            "Parametros \"desde\" y \"hasta\" requeridos".to_string(),
        ));
    };
    if !is_valid_date(desde) || !is_valid_date(hasta) {
        return Err(ApiError::Validation(
            "Formato de fecha inválido, use YYYY-MM-DD".to_string(),
        ));
    }

    let rows = state.records.by_date_range(desde, hasta).await?;
    tracing::info!(desde, hasta, count = rows.len(), "search by date range");

    let wants_csv = params
        .format
        .as_deref()
        .is_some_and(|f| f.eq_ignore_ascii_case("csv"));

    if wants_csv {
        let body = records_to_csv(&rows);
        return Ok((
            [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"backup_{desde}_to_{hasta}.csv\""),
                ),
            ],
            body,
        )
            .into_response());
    }

    Ok(Json(json!({ "count": rows.len(), "data": rows })).into_response())
}
