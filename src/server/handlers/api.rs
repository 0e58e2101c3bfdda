//! API endpoint handlers for record lookup and search.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use super::super::error::ApiError;
use super::super::AppState;
use super::dates::is_valid_date;

/// Query parameters for the record list.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

/// Single record by id. 404 when no row matches.
pub async fn get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("El id debe ser numérico".to_string()))?;

    match state.records.get(id).await? {
        Some(row) => {
            tracing::info!(id, "search by id");
            Ok(Json(json!({ "message": "Registro encontrado", "data": row })).into_response())
        }
        None => Err(ApiError::NotFound(
            "No se encontró ningún registro con ese ID".to_string(),
        )),
    }
}

/// List records, newest first. `limit` defaults to 100 and is capped.
pub async fn list_records(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ApiError> {
    let limit = params
        .limit
        .unwrap_or(state.default_limit)
        .clamp(1, state.max_limit);

    let rows = state.records.list(limit).await?;
    Ok(Json(json!({ "count": rows.len(), "data": rows })).into_response())
}

/// Records for one exact date.
pub async fn search_by_date(
    State(state): State<AppState>,
    Path(fecha): Path<String>,
) -> Result<Response, ApiError> {
    let fecha = fecha.trim().to_string();
    if !is_valid_date(&fecha) {
        return Err(ApiError::Validation(
            "Formato de fecha inválido, use YYYY-MM-DD".to_string(),
        ));
    }

    let rows = state.records.by_date(&fecha).await?;
    tracing::info!(%fecha, count = rows.len(), "search by date");
    Ok(Json(json!({
        "message": format!("Se encontraron {} registros para la fecha {}", rows.len(), fecha),
        "data": rows,
    }))
    .into_response())
}

/// Substring search on the title. At least two characters after trimming.
pub async fn search_by_keyword(
    State(state): State<AppState>,
    Path(keyword): Path<String>,
) -> Result<Response, ApiError> {
    let keyword = keyword.trim().to_string();
    if keyword.chars().count() < 2 {
        return Err(ApiError::Validation(
            "La keyword debe tener al menos 2 caracteres".to_string(),
        ));
    }

    let rows = state.records.by_title_keyword(&keyword).await?;
    tracing::info!(%keyword, count = rows.len(), "search by keyword");
    Ok(Json(json!({ "count": rows.len(), "data": rows })).into_response())
}

/// Category search via the fallback resolver. The response carries the
/// strategy tag that produced the rows.
pub async fn search_by_category(
    State(state): State<AppState>,
    Path(categoria): Path<String>,
) -> Result<Response, ApiError> {
    let categoria = categoria.trim().to_string();
    if categoria.is_empty() {
        return Err(ApiError::Validation("categoria requerida".to_string()));
    }

    let resolution = state.records.search_by_category(&categoria).await?;
    tracing::info!(
        %categoria,
        strategy = resolution.strategy,
        count = resolution.rows.len(),
        "search by category"
    );
    Ok(Json(json!({
        "method": resolution.strategy,
        "count": resolution.rows.len(),
        "data": resolution.rows,
    }))
    .into_response())
}

/// Old clients still call /api/badabun/:id; send them to the current route.
/// The 302 status is part of the legacy contract, so the response is built
/// by hand rather than with axum's 303/307 helpers.
pub async fn legacy_redirect(Path(id): Path<String>) -> Response {
    let location = format!("/api/backup/{}", urlencoding::encode(&id));
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
