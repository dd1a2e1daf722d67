use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{SearchParams, SearchQuery, SearchResponse},
    routes::AppState,
    services::search::find_recipes,
};

/// Handler for recipe search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<SearchResponse>> {
    let query = params
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
        .and_then(|Query(params)| SearchQuery::from_params(params))
        .inspect_err(|e| {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected recipe search");
        })?;

    tracing::info!(
        request_id = %request_id,
        ingredients = ?query.ingredients,
        mood = ?query.context.mood,
        cooking_time = ?query.context.cooking_time,
        dietary = ?query.context.dietary,
        skill_level = ?query.context.skill_level,
        "Processing recipe search"
    );

    let response = find_recipes(state.catalog.clone(), &state.refiner, query).await?;

    tracing::info!(
        request_id = %request_id,
        total_found = response.total_found,
        refined_count = response.refined_count,
        "Recipe search completed"
    );

    Ok(Json(response))
}
