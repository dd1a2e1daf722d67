use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub environment: EnvironmentSummary,
}

/// Which collaborators are configured; never exposes the key itself
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSummary {
    pub has_gemini_key: bool,
    pub mealdb_url: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        environment: EnvironmentSummary {
            has_gemini_key: state.config.has_gemini_key(),
            mealdb_url: state.config.mealdb_base_url.clone(),
        },
    })
}

/// Liveness probe used by the browser client
pub async fn test() -> Json<Value> {
    Json(json!({ "message": "Server is running!" }))
}
