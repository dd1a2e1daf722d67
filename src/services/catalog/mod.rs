/// Recipe catalog abstraction
///
/// A catalog answers one question: which recipes use a given ingredient.
/// Cross-ingredient merging lives in the aggregator, so implementations stay
/// single-request and stateless apart from their HTTP client.
use crate::models::RawRecipe;

pub mod mealdb;

pub use mealdb::MealDbCatalog;

/// Trait for ingredient-indexed recipe catalogs
///
/// Lookups are infallible from the caller's point of view: a transport error,
/// bad status, or undecodable body yields an empty list so that one bad
/// ingredient never aborts a whole search.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// Fetch every recipe the catalog associates with `ingredient`
    async fn fetch_by_ingredient(&self, ingredient: &str) -> Vec<RawRecipe>;
}
