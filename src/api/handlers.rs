//! API Handlers
//!
//! HTTP request handlers for each admin endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::cache::Cache;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, HealthResponse, InvalidateRequest, InvalidateResponse, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide cache handle
    pub cache: Arc<Cache>,
}

impl AppState {
    /// Creates a new AppState around an existing cache.
    pub fn new(cache: Arc<Cache>) -> Self {
        Self { cache }
    }
}

/// Handler for DELETE /keys/:key
///
/// Deletes are fire-and-forget: a missing key or an unreachable store
/// still answers 200.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.cache.delete(&key).await;
    Json(DeleteResponse::new(key))
}

/// Handler for POST /invalidate
pub async fn invalidate_handler(
    State(state): State<AppState>,
    Json(req): Json<InvalidateRequest>,
) -> Result<Json<InvalidateResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let deleted = state.cache.delete_pattern(&req.pattern).await;
    info!(pattern = %req.pattern, deleted, "Invalidated keys by pattern");

    Ok(Json(InvalidateResponse::new(req.pattern, deleted)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.cache.backend()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStore;

    fn test_state() -> AppState {
        AppState::new(Arc::new(Cache::new(Arc::new(MemoryStore::new()))))
    }

    #[tokio::test]
    async fn test_delete_handler() {
        let state = test_state();
        state.cache.set("chef:gordon", &1u32, 300).await;

        let response = delete_handler(State(state.clone()), Path("chef:gordon".to_string())).await;
        assert_eq!(response.key, "chef:gordon");

        assert_eq!(state.cache.get::<u32>("chef:gordon").await, None);
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let state = test_state();
        state.cache.set("trending:en", &1u32, 60).await;
        state.cache.set("trending:fr", &2u32, 60).await;

        let req = InvalidateRequest {
            pattern: "trending:*".to_string(),
        };
        let response = invalidate_handler(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(response.deleted, 2);
    }

    #[tokio::test]
    async fn test_invalidate_rejects_empty_pattern() {
        let state = test_state();
        let req = InvalidateRequest {
            pattern: "".to_string(),
        };
        let result = invalidate_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        let _ = state.cache.get::<u32>("missing").await;

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.hits, 0);
        assert_eq!(response.stats.misses, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.backend, "memory");
        assert!(!response.distributed);
    }
}
