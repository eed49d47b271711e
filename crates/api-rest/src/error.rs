//! Mapping from catalogue errors to HTTP responses.
//!
//! This is the only place where an error kind turns into a status code. Every error response
//! carries a JSON body of the form `{"error": "<message>"}`.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalogue_core::{CatalogueError, CatalogueResult, FilesError};
use serde::Serialize;
use utoipa::ToSchema;

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Catalogue(CatalogueError),
    Multipart(MultipartError),
    BadRequest(String),
    NotFound(String),
    /// A blocking catalogue task panicked or was cancelled.
    Task(tokio::task::JoinError),
}

impl From<CatalogueError> for ApiError {
    fn from(e: CatalogueError) -> Self {
        Self::Catalogue(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Multipart(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Multipart(e) => (e.status(), e.body_text()),
            ApiError::Task(e) => {
                tracing::error!("catalogue task failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Catalogue(e) => match e {
                CatalogueError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                CatalogueError::ProductNotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                CatalogueError::Files(FilesError::NotFound(_) | FilesError::InvalidPath(_)) => {
                    (StatusCode::NOT_FOUND, "File not found".to_string())
                }
                CatalogueError::Storage { .. }
                | CatalogueError::CorruptData { .. }
                | CatalogueError::IdsExhausted(_)
                | CatalogueError::Files(FilesError::Io(_)) => {
                    tracing::error!("request failed: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Runs a synchronous catalogue call on the blocking thread pool.
///
/// Product operations do file I/O and may wait on the catalogue write lock, neither of which
/// belongs on an async worker thread.
pub(crate) async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> CatalogueResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(ApiError::Task)?
        .map_err(ApiError::from)
}
