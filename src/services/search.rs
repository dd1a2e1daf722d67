use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::{
    error::AppResult,
    models::{SearchQuery, SearchResponse},
    services::{aggregator, catalog::RecipeCatalog, dietary, refinement::RecipeRefiner},
};

/// Runs one search end to end.
///
/// Aggregation only happens when ingredients were given; otherwise the
/// refiner sees an empty candidate set and answers from mood and dietary
/// context alone.
#[instrument(skip_all, fields(ingredients = query.ingredients.len()))]
pub async fn find_recipes(
    catalog: Arc<dyn RecipeCatalog>,
    refiner: &RecipeRefiner,
    query: SearchQuery,
) -> AppResult<SearchResponse> {
    let candidates = if query.ingredients.is_empty() {
        Vec::new()
    } else {
        aggregator::aggregate(catalog, &query.ingredients, &query.context.dietary).await?
    };

    let total_found = candidates.len();
    tracing::info!(total_found, "Aggregated catalog candidates");

    let filtered = dietary::filter(candidates, &query.context.dietary);
    if filtered.len() < total_found {
        tracing::debug!(
            removed = total_found - filtered.len(),
            "Dietary filter removed candidates"
        );
    }

    let recipes = refiner
        .refine(&filtered, &query.ingredients, &query.context)
        .await;

    Ok(SearchResponse {
        success: true,
        total_found,
        refined_count: recipes.len(),
        recipes,
        search_criteria: query,
        timestamp: Utc::now(),
    })
}
