use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;
use serde_json::{json, Value};

use rollsync_merge::Document;
use rollsync_sync::{SyncGateway, SyncResult};
use rollsync_types::{DocumentKind, MonthId};

use crate::error::ServerResult;

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub gateway: Arc<SyncGateway>,
}

impl AppState {
    pub fn new(gateway: Arc<SyncGateway>) -> Self {
        Self { gateway }
    }

    /// Run a gateway call on the blocking pool.
    async fn run<T, F>(&self, f: F) -> ServerResult<T>
    where
        F: FnOnce(&SyncGateway) -> SyncResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let gateway = Arc::clone(&self.gateway);
        Ok(tokio::task::spawn_blocking(move || f(&gateway)).await??)
    }
}

/// Health check handler.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<Value> {
    Json(json!({
        "name": "rollsync-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/data/:kind`
pub async fn pull_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ServerResult<Json<Document>> {
    let kind = DocumentKind::parse(&kind)?;
    let document = state.run(move |gateway| gateway.pull(&kind)).await?;
    Ok(Json(document))
}

/// `POST /api/sync/:kind`
pub async fn sync_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Json(body): Json<Value>,
) -> ServerResult<Json<Document>> {
    let kind = DocumentKind::parse(&kind)?;
    let merged = state.run(move |gateway| gateway.sync(&kind, submitted(body))).await?;
    Ok(Json(merged))
}

/// `GET /api/attendance/:month`
pub async fn pull_month_handler(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> ServerResult<Json<Document>> {
    let kind = DocumentKind::Attendance(MonthId::parse(&month)?);
    let document = state.run(move |gateway| gateway.pull(&kind)).await?;
    Ok(Json(document))
}

/// `POST /api/attendance/:month`
pub async fn sync_month_handler(
    State(state): State<AppState>,
    Path(month): Path<String>,
    Json(body): Json<Value>,
) -> ServerResult<Json<Document>> {
    let kind = DocumentKind::Attendance(MonthId::parse(&month)?);
    let merged = state.run(move |gateway| gateway.sync(&kind, submitted(body))).await?;
    Ok(Json(merged))
}

/// `GET /api/attendance`
pub async fn list_months_handler(State(state): State<AppState>) -> ServerResult<Json<Vec<MonthId>>> {
    let months = state.run(|gateway| gateway.list_months()).await?;
    Ok(Json(months))
}

/// A `null` body means the client has nothing to submit.
fn submitted(body: Value) -> Option<Value> {
    (!body.is_null()).then_some(body)
}
