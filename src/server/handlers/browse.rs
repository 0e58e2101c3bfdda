//! Server-rendered browse page.

use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use serde_json::Value;

use super::super::error::ApiError;
use super::super::templates;
use super::super::AppState;
use super::api::ListParams;

/// Plain HTML listing of the most recent records.
pub async fn browse_records(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let limit = params
        .limit
        .unwrap_or(state.default_limit)
        .clamp(1, state.max_limit);

    let rows = state.records.list(limit).await?;
    let values: Vec<Value> = rows
        .iter()
        .filter_map(|r| serde_json::to_value(r).ok())
        .collect();

    let content = templates::records_table(&values);
    Ok(Html(templates::base_template("Backup", &content)).into_response())
}
