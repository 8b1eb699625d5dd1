use crate::errors::{AppError, AppResult};
use crate::models::Record;
use crate::server::SharedService;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use tracing::error;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, self.to_string()).into_response()
    }
}

fn decode<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| {
        error!(error = %e, "reading request failed");
        AppError::from(e)
    })
}

/// Run a blocking store call off the async workers.
async fn blocking<T, F>(service: SharedService, op: &'static str, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&crate::core::SyncService) -> AppResult<T> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| AppError::Other(e.to_string()))?;
    if let Err(e) = &result {
        error!(operation = op, error = %e, "request failed");
    }
    result
}

pub async fn store(State(service): State<SharedService>, body: Bytes) -> AppResult<StatusCode> {
    let records: Vec<Record> = decode(&body)?;
    blocking(service, "store", move |s| s.ingest(&records)).await?;
    Ok(StatusCode::OK)
}

pub async fn history(
    State(service): State<SharedService>,
    body: Bytes,
) -> AppResult<Json<Vec<Record>>> {
    let watermarks: HashMap<String, String> = decode(&body)?;
    let records = blocking(service, "history", move |s| s.delta(&watermarks)).await?;
    Ok(Json(records))
}

pub async fn latest(
    State(service): State<SharedService>,
    body: Bytes,
) -> AppResult<Json<HashMap<String, String>>> {
    let devices: Vec<String> = decode(&body)?;
    let devices: HashSet<String> = devices.into_iter().collect();
    let latest = blocking(service, "latest", move |s| s.watermarks(&devices)).await?;
    Ok(Json(latest))
}
