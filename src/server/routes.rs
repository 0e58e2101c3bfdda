//! Router configuration for the web server.

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::handlers;
use super::AppState;

/// Create the main router with all routes.
///
/// An empty origin list means permissive CORS (development mode); otherwise
/// only the configured origins are allowed.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        // Server-rendered browse page
        .route("/", get(handlers::browse_records))
        // Record lookup
        .route("/api/backup", get(handlers::list_records))
        .route("/api/backup/:id", get(handlers::get_record))
        // Legacy alias kept for old clients
        .route("/api/badabun/:id", get(handlers::legacy_redirect))
        // Search
        .route("/api/buscar/fecha/:fecha", get(handlers::search_by_date))
        .route("/api/buscar/fechas", get(handlers::search_by_date_range))
        .route("/api/buscar/keyword/:keyword", get(handlers::search_by_keyword))
        .route(
            "/api/buscar/categoria/:categoria",
            get(handlers::search_by_category),
        )
        .layer(cors)
        .with_state(state)
}
