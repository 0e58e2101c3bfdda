//! Web server exposing the backup log query API.
//!
//! Every endpoint is a stateless read: validate input, run one statement
//! (or the category fallback sequence), serialize rows to JSON or CSV.

mod csv;
mod error;
mod handlers;
mod routes;
mod templates;

pub use error::ApiError;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::repository::{DbPool, RecordRepository, RecordStore};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    /// Injected store handle; tests swap in a double.
    pub records: Arc<dyn RecordStore>,
    /// Row cap applied when the client does not send `limit`.
    pub default_limit: i64,
    /// Upper bound on any client-supplied `limit`.
    pub max_limit: i64,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let pool = DbPool::from_url(&settings.database_url, settings.pool_size)?;
        tracing::info!(backend = pool.backend(), "database pool ready");

        let repo = RecordRepository::new(pool, Duration::from_secs(settings.query_timeout_secs));
        Ok(Self {
            records: Arc::new(repo),
            default_limit: settings.default_limit,
            max_limit: settings.max_limit,
        })
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state, &settings.cors_origins);

    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::models::Record;
    use crate::repository::category::FALLBACK_TAG;
    use crate::repository::{CategoryResolution, StoreError};

    /// In-memory store double reproducing the SQL-side filtering semantics.
    struct MemoryStore {
        rows: Vec<Record>,
    }

    fn sorted_desc(mut rows: Vec<Record>) -> Vec<Record> {
        rows.sort_by(|a, b| b.fecha.cmp(&a.fecha).then(b.hora.cmp(&a.hora)));
        rows
    }

    #[async_trait]
    impl RecordStore for MemoryStore {
        async fn get(&self, id: i64) -> Result<Option<Record>, StoreError> {
            Ok(self.rows.iter().find(|r| r.id == id).cloned())
        }

        async fn list(&self, limit: i64) -> Result<Vec<Record>, StoreError> {
            let mut rows = sorted_desc(self.rows.clone());
            rows.truncate(limit as usize);
            Ok(rows)
        }

        async fn by_date(&self, fecha: &str) -> Result<Vec<Record>, StoreError> {
            Ok(sorted_desc(
                self.rows
                    .iter()
                    .filter(|r| r.fecha.as_deref() == Some(fecha))
                    .cloned()
                    .collect(),
            ))
        }

        async fn by_date_range(
            &self,
            desde: &str,
            hasta: &str,
        ) -> Result<Vec<Record>, StoreError> {
            Ok(sorted_desc(
                self.rows
                    .iter()
                    .filter(|r| {
                        r.fecha
                            .as_deref()
                            .is_some_and(|f| f >= desde && f <= hasta)
                    })
                    .cloned()
                    .collect(),
            ))
        }

        async fn by_title_keyword(&self, keyword: &str) -> Result<Vec<Record>, StoreError> {
            Ok(self
                .rows
                .iter()
                .filter(|r| r.titulo.as_deref().is_some_and(|t| t.contains(keyword)))
                .cloned()
                .collect())
        }

        async fn search_by_category(
            &self,
            categoria: &str,
        ) -> Result<CategoryResolution, StoreError> {
            Ok(CategoryResolution {
                strategy: FALLBACK_TAG,
                rows: self
                    .rows
                    .iter()
                    .filter(|r| r.categoria.as_deref().is_some_and(|c| c.contains(categoria)))
                    .cloned()
                    .collect(),
            })
        }
    }

    fn record(id: i64, fecha: &str, hora: &str, titulo: &str) -> Record {
        Record {
            id,
            fecha: Some(fecha.to_string()),
            hora: Some(hora.to_string()),
            titulo: Some(titulo.to_string()),
            editor: Some("Ana".to_string()),
            categoria: Some("Entretenimiento".to_string()),
            formato: Some("video".to_string()),
            version: Some("V1".to_string()),
            yt: Some("VERDADERO".to_string()),
            ig: Some("no".to_string()),
            tt: None,
            th: None,
            x: None,
            link: None,
        }
    }

    fn test_app() -> axum::Router {
        let rows = vec![
            record(1, "2024-01-10", "10:00", "Estreno de enero"),
            record(2, "2024-01-12", "08:00", "Resumen, con comas"),
            record(3, "2024-01-12", "21:30", "Especial de noche"),
            record(4, "2024-02-01", "12:00", "Fuera de rango"),
        ];
        let state = AppState {
            records: Arc::new(MemoryStore { rows }),
            default_limit: 100,
            max_limit: 1000,
        };
        create_router(state, &[])
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, _, body) = get(app, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_get_record_found() {
        let (status, json) = get_json(test_app(), "/api/backup/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Registro encontrado");
        assert_eq!(json["data"]["id"], 1);
        assert_eq!(json["data"]["titulo"], "Estreno de enero");
    }

    #[tokio::test]
    async fn test_get_record_missing_is_404_with_message() {
        let (status, json) = get_json(test_app(), "/api/backup/999999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_list_is_ordered_newest_first() {
        let (status, json) = get_json(test_app(), "/api/backup").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 4);
        let ids: Vec<i64> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![4, 3, 2, 1]);
    }

    #[tokio::test]
    async fn test_single_date_search() {
        let (status, json) = get_json(test_app(), "/api/buscar/fecha/2024-01-12").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["message"],
            "Se encontraron 2 registros para la fecha 2024-01-12"
        );
    }

    #[tokio::test]
    async fn test_range_is_inclusive_and_ordered() {
        let (status, json) =
            get_json(test_app(), "/api/buscar/fechas?desde=2024-01-10&hasta=2024-01-12").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 3);
        let ids: Vec<i64> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        // date desc, then time desc
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_range_csv_download() {
        let (status, headers, body) = get(
            test_app(),
            "/api/buscar/fechas?desde=2024-01-10&hasta=2024-01-12&format=csv",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[axum::http::header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            headers[axum::http::header::CONTENT_DISPOSITION],
            "attachment; filename=\"backup_2024-01-10_to_2024-01-12.csv\""
        );

        let text = String::from_utf8(body).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,fecha,hora,titulo,editor,categoria,formato,version,yt,ig,tt,th,x,link"
        );
        // A title containing a comma must come back quoted
        assert!(text.contains("\"Resumen, con comas\""));
    }

    #[tokio::test]
    async fn test_range_csv_empty_body_without_headers() {
        let (status, headers, body) = get(
            test_app(),
            "/api/buscar/fechas?desde=1999-01-01&hasta=1999-01-02&format=csv",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[axum::http::header::CONTENT_TYPE], "text/csv");
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_keyword_search() {
        let (status, json) = get_json(test_app(), "/api/buscar/keyword/Especial").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 1);
    }

    #[tokio::test]
    async fn test_category_search_reports_strategy() {
        let (status, json) = get_json(test_app(), "/api/buscar/categoria/Entretenimiento").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["method"], "fallback_table_query");
        assert_eq!(json["count"], 4);
    }

    #[tokio::test]
    async fn test_browse_page_renders_normalized_values() {
        let (status, _, body) = get(test_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        // VERDADERO/no flags are presented as Sí/No
        assert!(html.contains("<td>Sí</td>"));
        assert!(html.contains("<td>No</td>"));
    }
}
