use std::{any::Any, sync::Arc};

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{MealDbCatalog, RecipeCatalog, RecipeRefiner},
};

pub mod health;
pub mod recipes;

/// Shared, read-only application state
pub struct AppState {
    pub catalog: Arc<dyn RecipeCatalog>,
    pub refiner: RecipeRefiner,
    pub config: Config,
}

impl AppState {
    /// Wires the production collaborators around one pooled HTTP client
    pub fn from_config(http_client: reqwest::Client, config: Config) -> Self {
        Self {
            catalog: Arc::new(MealDbCatalog::new(
                http_client.clone(),
                config.mealdb_base_url.clone(),
                config.catalog_timeout(),
            )),
            refiner: RecipeRefiner::from_config(http_client, &config),
            config,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/test", get(health::test))
        .route("/api/health", get(health::health_check))
        .route("/api/recipes", get(recipes::search))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // Outermost, so the trace span can see the request ID
        .layer(middleware::from_fn(request_id_middleware))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "Unknown panic".to_string()
    };

    tracing::error!(details = %details, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal server error",
            "details": details,
        })),
    )
        .into_response()
}
