/// TheMealDB catalog client
///
/// Uses the free `filter.php?i=<ingredient>` endpoint, which returns only id,
/// name, and thumbnail per meal. Full recipe details are a client-side concern.
use crate::{
    error::{AppError, AppResult},
    models::{MealDbFilterResponse, RawRecipe},
    services::catalog::RecipeCatalog,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct MealDbCatalog {
    http_client: HttpClient,
    api_url: String,
    timeout: Duration,
}

impl MealDbCatalog {
    /// `timeout` bounds each lookup so one stalled ingredient cannot hold up
    /// the whole fan-out
    pub fn new(http_client: HttpClient, api_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn filter_url(&self) -> String {
        format!("{}/filter.php", self.api_url)
    }

    /// Single lookup with errors intact; `fetch_by_ingredient` swallows them
    async fn try_fetch(&self, ingredient: &str) -> AppResult<Vec<RawRecipe>> {
        let response = self
            .http_client
            .get(self.filter_url())
            .query(&[("i", ingredient)])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TheMealDB returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let filtered: MealDbFilterResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                tracing::debug!(response = %response_text, "Undecodable TheMealDB response");
                AppError::ExternalApi(format!("Failed to parse TheMealDB response: {}", e))
            })?;

        Ok(filtered.meals.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl RecipeCatalog for MealDbCatalog {
    async fn fetch_by_ingredient(&self, ingredient: &str) -> Vec<RawRecipe> {
        match self.try_fetch(ingredient).await {
            Ok(recipes) => {
                tracing::debug!(
                    ingredient = %ingredient,
                    results = recipes.len(),
                    provider = "mealdb",
                    "Ingredient lookup completed"
                );
                recipes
            }
            Err(e) => {
                tracing::warn!(
                    ingredient = %ingredient,
                    error = %e,
                    provider = "mealdb",
                    "Ingredient lookup failed, contributing no recipes"
                );
                Vec::new()
            }
        }
    }
}
