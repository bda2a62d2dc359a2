use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::Json;
use serde::Serialize;
use serde_json::json;

use sablon_service::{Inserted, RecordService, ServiceResult};
use sablon_types::SablonRecord;

use crate::config::ServerConfig;
use crate::error::{ApiError, ServerResult};
use crate::extract::{self, Lookup, PathId};

/// Shared handler state: one service for the whole process.
#[derive(Clone, Debug)]
pub struct AppState {
    pub service: Arc<RecordService>,
}

impl AppState {
    pub fn new(service: Arc<RecordService>) -> Self {
        Self { service }
    }

    /// Open the configured store and wrap it in a service.
    pub fn from_config(config: &ServerConfig) -> ServerResult<Self> {
        let store = config.open_store()?;
        let service = RecordService::new(store, config.namespace()?);
        Ok(Self::new(Arc::new(service)))
    }
}

/// Either a single record (lookup by id) or a list (lookup by query).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Sabloane {
    One(SablonRecord),
    Many(Vec<SablonRecord>),
}

#[derive(Debug, Serialize)]
pub struct ResultMessage {
    pub result: String,
}

/// Run a service call on the blocking pool; backends may do file I/O.
async fn call<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&RecordService) -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let service = Arc::clone(&state.service);
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| ApiError::internal(format!("service task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "name": "sablon-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /sablon/`
pub async fn create_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Inserted>, ApiError> {
    let payload = extract::required_json(&body)?;
    let inserted = call(&state, move |s| s.add_raw(payload)).await?;
    Ok(Json(inserted))
}

/// `GET /sablon/`
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<SablonRecord>>, ApiError> {
    let all = call(&state, |s| s.list_all()).await?;
    Ok(Json(all))
}

/// `GET /sablon/sabloane/{id or None}` with an optional query body.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    body: Bytes,
) -> Result<Json<Sabloane>, ApiError> {
    let query = extract::query_body(&body)?;
    let found = match Lookup::select(PathId::from_segment(&segment), query) {
        Some(Lookup::Id(id)) => Sabloane::One(call(&state, move |s| s.get_by_id(&id)).await?),
        Some(Lookup::Query(q)) => Sabloane::Many(call(&state, move |s| s.get_by_query(&q)).await?),
        None => return Err(ApiError::bad_request("Error! Bad get request")),
    };
    Ok(Json(found))
}

/// `PUT /sablon/{id}` with a partial record body.
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ResultMessage>, ApiError> {
    let partial = extract::required_object(&body)?;
    extract::check_partial_fields(&partial)?;
    let summary = call(&state, move |s| s.update_by_id(&id, &partial)).await?;
    Ok(Json(ResultMessage {
        result: format!("Documents updated: {}", summary.modified_count),
    }))
}

/// `DELETE /sablon/{id or None}` with an optional query body.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    body: Bytes,
) -> Result<Json<ResultMessage>, ApiError> {
    let query = extract::query_body(&body)?;
    let result = match Lookup::select(PathId::from_segment(&segment), query) {
        Some(Lookup::Id(id)) => {
            let summary = call(&state, move |s| s.delete_by_id(&id)).await?;
            format!("Documents deleted: {}", summary.deleted_count)
        }
        Some(Lookup::Query(q)) => {
            let summary = call(&state, move |s| s.delete_by_query(&q)).await?;
            format!("Document deleted: {}", summary.deleted_count)
        }
        None => {
            return Err(ApiError::bad_request(
                "Invalid request. Please provide either an ID in the URL path or a JSON body.",
            ))
        }
    };
    Ok(Json(ResultMessage { result }))
}
