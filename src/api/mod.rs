//! Read API
//!
//! A single endpoint, `GET /tenders`, returning every stored row as JSON.
//! Each request opens the store, reads, and closes it again.

use crate::storage::{self, StorageError};
use crate::tender::StoredTender;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

/// Errors surfaced by the read API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("GET /tenders failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Shared state: where the store lives
#[derive(Debug, Clone)]
pub struct ApiState {
    database_path: Arc<PathBuf>,
}

impl ApiState {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: Arc::new(database_path.into()),
        }
    }
}

/// Builds the API router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/tenders", get(list_tenders))
        .with_state(state)
}

async fn list_tenders(
    State(state): State<ApiState>,
) -> Result<Json<Vec<StoredTender>>, ApiError> {
    let path = Arc::clone(&state.database_path);
    let tenders = tokio::task::spawn_blocking(move || storage::list_all(&path)).await??;
    tracing::debug!("GET /tenders -> {} rows", tenders.len());
    Ok(Json(tenders))
}

/// Serves the API on an already bound listener until the process exits
pub async fn serve_on(listener: TcpListener, state: ApiState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

/// Binds `addr` and serves the API until the process exits
pub async fn serve(addr: SocketAddr, state: ApiState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Read API listening on http://{}", listener.local_addr()?);
    serve_on(listener, state).await
}
