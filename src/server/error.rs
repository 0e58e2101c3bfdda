//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::repository::StoreError;

/// Errors an API handler can produce.
///
/// Store failures reach the client as a generic message; the detail is
/// logged server-side only.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, rejected before touching the store.
    #[error("{0}")]
    Validation(String),

    /// No row matched.
    #[error("{0}")]
    NotFound(String),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Store(StoreError::Timeout(deadline)) => {
                tracing::error!(?deadline, "store call exceeded deadline");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    Json(json!({
                        "message": "Timeout: la base de datos tardó demasiado en responder"
                    })),
                )
                    .into_response()
            }
            ApiError::Store(e) => {
                tracing::error!(error = %e, "store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "message": "Error interno consultando la base de datos"
                    })),
                )
                    .into_response()
            }
        }
    }
}
