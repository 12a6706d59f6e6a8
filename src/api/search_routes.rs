//! Search API Routes
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/search` | POST | Resolve a phrase into a verse |
//! | `/health` | GET | Liveness probe |

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use gurbani_types::{ResolveRequest, ResolveResponse};
use serde_json::{json, Value};

use crate::engine::QueryEngine;
use crate::error::EngineError;

/// Shared state for search routes
#[derive(Clone)]
pub struct SearchState {
    pub engine: Arc<QueryEngine>,
}

type ApiError = (StatusCode, Json<Value>);

impl From<EngineError> for (StatusCode, Json<Value>) {
    fn from(err: EngineError) -> Self {
        let status = match err {
            EngineError::EmptyQuery => StatusCode::BAD_REQUEST,
        };
        (status, Json(json!({ "error": err.to_string() })))
    }
}

/// POST /api/search
async fn search(
    State(state): State<SearchState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let response = state.engine.resolve(&request).await?;
    Ok(Json(response))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn create_search_router(engine: Arc<QueryEngine>) -> Router {
    Router::new()
        .route("/api/search", post(search))
        .route("/health", get(health))
        .with_state(SearchState { engine })
}
