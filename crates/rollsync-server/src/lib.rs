//! HTTP server for rollsync.
//!
//! Exposes the sync gateway to offline-first clients. Clients pull a
//! document, edit it locally while offline, and later post their copy back;
//! the response is the merged document, which the client adopts as its new
//! local copy.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::RollsyncServer;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use rollsync_store::InMemoryDocumentStore;
    use rollsync_sync::SyncGateway;
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    fn app() -> Router {
        let gateway = SyncGateway::new(Arc::new(InMemoryDocumentStore::new()));
        router::build_router(AppState::new(Arc::new(gateway)), 1024 * 1024)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = send(&app(), Method::GET, "/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (status, body) = send(&app(), Method::GET, "/v1/info", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("rollsync-server"));
    }

    #[tokio::test]
    async fn pull_empty_documents() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/data/workers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));

        let (status, body) = send(&app, Method::GET, "/api/attendance/2024-05", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["groups"], json!([]));
    }

    #[tokio::test]
    async fn sync_then_pull() {
        let app = app();
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/sync/workers",
            Some(json!({"items": [{"id": 1, "name": "A", "modifiedAt": "2024-01-01T00:00:00Z"}]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, merged) = send(
            &app,
            Method::POST,
            "/api/sync/workers",
            Some(json!({"items": [
                {"id": 1, "name": "A2", "modifiedAt": "2024-02-01T00:00:00Z"},
                {"id": 2, "name": "B", "modifiedAt": "2024-02-01T00:00:00Z"}
            ]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            merged["items"],
            json!([
                {"id": 1, "name": "A2", "modifiedAt": "2024-02-01T00:00:00Z"},
                {"id": 2, "name": "B", "modifiedAt": "2024-02-01T00:00:00Z"}
            ])
        );
        assert!(merged["lastModified"].is_string());

        let (_, pulled) = send(&app, Method::GET, "/api/data/workers", None).await;
        assert_eq!(pulled, merged);
    }

    #[tokio::test]
    async fn settings_sync_overlays() {
        let app = app();
        send(&app, Method::POST, "/api/sync/settings", Some(json!({"a": 1, "b": 1}))).await;
        let (status, merged) = send(&app, Method::POST, "/api/sync/settings", Some(json!({"b": 2}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(merged["a"], json!(1));
        assert_eq!(merged["b"], json!(2));
    }

    #[tokio::test]
    async fn month_sync_and_listing() {
        let app = app();
        for month in ["2024-06", "2024-05"] {
            let (status, _) = send(
                &app,
                Method::POST,
                &format!("/api/attendance/{month}"),
                Some(json!({"groups": [{"id": "g1", "workerIds": [1]}]})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, months) = send(&app, Method::GET, "/api/attendance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(months, json!(["2024-05", "2024-06"]));
    }

    #[tokio::test]
    async fn null_body_syncs_nothing() {
        let (status, body) = send(&app(), Method::POST, "/api/sync/areas", Some(Value::Null)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));
    }

    #[tokio::test]
    async fn unknown_kind_is_bad_request() {
        let (status, body) = send(&app(), Method::GET, "/api/data/payroll", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("payroll"));
    }

    #[tokio::test]
    async fn malformed_month_is_bad_request() {
        let app = app();
        for uri in ["/api/attendance/2024-13", "/api/attendance/may", "/api/attendance/2024-%205"] {
            let (status, body) = send(&app, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string());
        }
    }

    #[tokio::test]
    async fn non_json_body_is_rejected() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/sync/workers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
