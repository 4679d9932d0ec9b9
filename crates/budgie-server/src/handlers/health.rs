//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub api_key_configured: bool,
    /// RFC 3339
    pub timestamp: String,
}

/// GET /api/health - Liveness and AI configuration status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        api_key_configured: state.ai.is_some(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
