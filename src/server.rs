// src/server.rs
//! HTTP routes for the assistant: save an entry, read recent entries.

use crate::constants::DEFAULT_READ_LIMIT;
use crate::error::AppError;
use crate::model::JournalEntry;
use crate::service::{JournalService, SaveRequest};
use crate::types::ValidationError;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SAVED_MESSAGE: &str = "Saved to Notion!";

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedBody {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    pub limit: Option<usize>,
    pub sort: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::warn!("Request rejected: {}", self);
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

pub fn router(service: Arc<JournalService>) -> Router {
    Router::new()
        .route("/save", post(save))
        .route("/entries", get(entries))
        .route("/health", get(health))
        .with_state(service)
}

async fn save(
    State(service): State<Arc<JournalService>>,
    request: Result<Json<SaveRequest>, JsonRejection>,
) -> Result<Json<SavedBody>, AppError> {
    let Json(request) = request?;
    let saved = service.save(request).await?;
    Ok(Json(SavedBody {
        id: saved.id.to_string(),
        message: SAVED_MESSAGE.to_string(),
    }))
}

async fn entries(
    State(service): State<Arc<JournalService>>,
    query: Result<Query<EntriesQuery>, QueryRejection>,
) -> Result<Json<Vec<JournalEntry>>, AppError> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(DEFAULT_READ_LIMIT);
    let entries = service.read_entries(limit, query.sort).await?;
    Ok(Json(entries))
}

async fn health() -> &'static str {
    "ok"
}

/// Serves the routes on `bind` until Ctrl-C.
pub async fn serve(service: Arc<JournalService>, bind: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| AppError::InternalError {
            message: format!("Failed to bind {}", bind),
            source: Some(Box::new(e)),
        })?;
    log::info!("Listening on {}", bind);

    let server = axum::serve(listener, router(service));
    tokio::select! {
        result = server => result?,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Shutdown signal received");
        }
    }
    Ok(())
}
