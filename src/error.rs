//! Error types for the caching layer
//!
//! Store adapters report failures through `CacheError`; the `Cache` facade
//! logs and swallows them, so consumers only see these from the admin API.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching layer.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Transport or protocol error from the remote store
    #[error("Store error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Remote store call exceeded the configured timeout
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),

    /// Payload could not be encoded or decoded as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Pattern could not be translated for the in-process store
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidRequest(_) | CacheError::Pattern(_) => StatusCode::BAD_REQUEST,
            CacheError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Redis(_) | CacheError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
