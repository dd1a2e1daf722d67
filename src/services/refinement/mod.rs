/// Candidate refinement
///
/// The generative service picks and annotates the best matches; whenever it
/// is unconfigured, unreachable, slow, or answers with something we cannot
/// decode, the deterministic fallback produces the same shape instead. Callers
/// never see a refinement error.
use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::instrument;

use crate::{
    config::{Config, PLACEHOLDER_API_KEY},
    error::{AppError, AppResult},
    models::{CandidateRecipe, RefinedRecipe, SearchContext},
};

pub mod fallback;
pub mod gemini;
pub mod parse;
pub mod prompt;

use gemini::{GenerateRequest, GenerateResponse};
use parse::ParsedRecipes;

/// Most recipes a refinement may return
pub const MAX_REFINED_RECIPES: usize = 8;

/// Gemini API keys issued by Google AI Studio share this prefix
const API_KEY_PREFIX: &str = "AIza";

/// Whether the configured key is worth a network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential<'a> {
    Missing,
    Malformed,
    Usable(&'a str),
}

impl<'a> Credential<'a> {
    pub fn check(api_key: Option<&'a str>) -> Self {
        match api_key.map(str::trim) {
            None => Credential::Missing,
            Some(key) if key.is_empty() || key == PLACEHOLDER_API_KEY => Credential::Missing,
            Some(key) if !key.starts_with(API_KEY_PREFIX) => Credential::Malformed,
            Some(key) => Credential::Usable(key),
        }
    }
}

/// Which path produced a refinement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinementSource {
    Generative,
    Fallback,
}

#[derive(Clone)]
pub struct RecipeRefiner {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    timeout: Duration,
}

impl RecipeRefiner {
    pub fn new(
        http_client: HttpClient,
        api_key: Option<String>,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.into(),
            timeout,
        }
    }

    pub fn from_config(http_client: HttpClient, config: &Config) -> Self {
        Self::new(
            http_client,
            config.gemini_api_key.clone(),
            config.gemini_base_url.clone(),
            config.refinement_timeout(),
        )
    }

    pub fn credential(&self) -> Credential<'_> {
        Credential::check(self.api_key.as_deref())
    }

    /// Selects and annotates at most eight recipes
    pub async fn refine(
        &self,
        candidates: &[CandidateRecipe],
        ingredients: &[String],
        context: &SearchContext,
    ) -> Vec<RefinedRecipe> {
        self.refine_with_source(candidates, ingredients, context)
            .await
            .0
    }

    /// Like [`refine`](Self::refine), also reporting which path answered
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn refine_with_source(
        &self,
        candidates: &[CandidateRecipe],
        ingredients: &[String],
        context: &SearchContext,
    ) -> (Vec<RefinedRecipe>, RefinementSource) {
        let api_key = match self.credential() {
            Credential::Usable(key) => key,
            Credential::Missing => {
                tracing::warn!("Gemini API key not configured, using fallback ranking");
                return Self::fallback(candidates, ingredients, context);
            }
            Credential::Malformed => {
                tracing::warn!(
                    expected_prefix = API_KEY_PREFIX,
                    "Gemini API key format looks invalid, using fallback ranking"
                );
                return Self::fallback(candidates, ingredients, context);
            }
        };

        let prompt = prompt::build_prompt(candidates, ingredients, context);

        match self.generate(api_key, prompt).await {
            Ok(text) => match parse::parse_recipes(&text) {
                ParsedRecipes::Parsed(mut recipes) if !recipes.is_empty() => {
                    recipes.truncate(MAX_REFINED_RECIPES);
                    tracing::info!(refined = recipes.len(), "Gemini refinement succeeded");
                    (recipes, RefinementSource::Generative)
                }
                ParsedRecipes::Parsed(_) => {
                    tracing::warn!("Gemini returned an empty recipe array, using fallback ranking");
                    Self::fallback(candidates, ingredients, context)
                }
                ParsedRecipes::Unparsable(reason) => {
                    tracing::error!(reason = %reason, "Unparsable Gemini response");
                    tracing::debug!(response = %text, "Raw Gemini response");
                    Self::fallback(candidates, ingredients, context)
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Gemini refinement failed, using fallback ranking");
                Self::fallback(candidates, ingredients, context)
            }
        }
    }

    fn fallback(
        candidates: &[CandidateRecipe],
        ingredients: &[String],
        context: &SearchContext,
    ) -> (Vec<RefinedRecipe>, RefinementSource) {
        (
            fallback::refine(candidates, ingredients, context),
            RefinementSource::Fallback,
        )
    }

    /// Sends one generation request and returns the generated text
    async fn generate(&self, api_key: &str, prompt: String) -> AppResult<String> {
        let request = GenerateRequest::from_prompt(prompt);

        let response = self
            .http_client
            .post(&self.api_url)
            .query(&[("key", api_key)])
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Gemini API returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await?;

        if let Some(error) = generated.error.as_ref() {
            return Err(AppError::ExternalApi(format!(
                "Gemini API error: {}",
                error.message
            )));
        }

        match generated.first_text() {
            Some(text) => Ok(text.to_string()),
            None => Err(AppError::Refinement(format!(
                "Gemini response contained no text (finish reason: {})",
                generated.finish_reason().unwrap_or("none")
            ))),
        }
    }
}
