use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;

use crate::error::{QueryError, StoreError};

/// Failures surfaced to HTTP clients.
#[derive(Debug)]
pub enum ApiError {
    /// No canonical dataset was loaded.
    DataUnavailable,
    /// The engine rejected the query parameters.
    Query(QueryError),
    /// The canonical store exists but could not be loaded.
    Store(StoreError),
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::Query(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::DataUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Data layer not initialized. Please run preprocessing.".to_string(),
            ),
            ApiError::Query(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };
        warn!(status = status.as_u16(), error = %message, "Request failed");

        (status, Json(json!({ "error": message }))).into_response()
    }
}
