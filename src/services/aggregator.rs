use crate::{
    error::{AppError, AppResult},
    models::{CandidateRecipe, DietaryTag, RawRecipe},
    services::catalog::RecipeCatalog,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Extra lookups that keep vegetarian searches from coming back empty
const VEGETARIAN_WIDENING: &[&str] = &[
    "tofu", "beans", "lentils", "quinoa", "spinach", "mushroom", "cheese",
];
const MAX_WIDENING_TERMS: usize = 2;

/// Terms to look up: the requested ingredients, plus widening terms for
/// vegetarian searches.
///
/// Only the first two widening terms are considered; either is skipped when
/// the user already asked for it.
pub fn search_terms(ingredients: &[String], dietary: &[DietaryTag]) -> Vec<String> {
    let mut terms = ingredients.to_vec();

    if dietary.contains(&DietaryTag::Vegetarian) {
        terms.extend(
            VEGETARIAN_WIDENING
                .iter()
                .take(MAX_WIDENING_TERMS)
                .filter(|extra| !ingredients.iter().any(|i| i == *extra))
                .map(|extra| extra.to_string()),
        );
    }

    terms
}

/// Fans out one catalog lookup per term and merges the results
///
/// Lookups run as independent tokio tasks and are all joined; a lookup that
/// fails inside the catalog simply contributes nothing. Only when no task
/// could be joined at all is the search reported as failed.
pub async fn aggregate(
    catalog: Arc<dyn RecipeCatalog>,
    ingredients: &[String],
    dietary: &[DietaryTag],
) -> AppResult<Vec<CandidateRecipe>> {
    let start = Instant::now();
    let terms = search_terms(ingredients, dietary);

    tracing::info!(
        requested = ingredients.len(),
        terms = terms.len(),
        "Fetching recipes per ingredient"
    );

    let mut tasks = Vec::with_capacity(terms.len());
    for term in &terms {
        let catalog = Arc::clone(&catalog);
        let term = term.clone();
        let task = tokio::spawn(async move { catalog.fetch_by_ingredient(&term).await });
        tasks.push(task);
    }

    let mut results = Vec::with_capacity(terms.len());
    let mut errors = Vec::new();

    for (term, task) in terms.iter().zip(tasks) {
        match task.await {
            Ok(recipes) => results.push((term.clone(), recipes)),
            Err(e) => {
                tracing::error!(ingredient = %term, error = %e, "Ingredient lookup task failed");
                errors.push(format!("{}: {}", term, e));
            }
        }
    }

    if results.is_empty() && !errors.is_empty() {
        return Err(AppError::Catalog(errors.join("; ")));
    }

    let candidates = merge(results);

    tracing::info!(
        candidates = candidates.len(),
        failed_lookups = errors.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Aggregation completed"
    );

    Ok(candidates)
}

/// Deduplicates per-term results by recipe id, in first-discovery order
pub fn merge(results: impl IntoIterator<Item = (String, Vec<RawRecipe>)>) -> Vec<CandidateRecipe> {
    let mut candidates: Vec<CandidateRecipe> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (ingredient, recipes) in results {
        for recipe in recipes {
            match positions.get(&recipe.id) {
                Some(&index) => {
                    candidates[index].add_found_ingredient(&ingredient);
                }
                None => {
                    positions.insert(recipe.id.clone(), candidates.len());
                    candidates.push(CandidateRecipe::new(recipe, ingredient.clone()));
                }
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::MockRecipeCatalog;
    use std::collections::HashSet;

    fn raw(id: &str, name: &str) -> RawRecipe {
        RawRecipe {
            id: id.to_string(),
            name: name.to_string(),
            thumbnail: format!("https://img.test/{}.jpg", id),
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn fixture_catalog(ingredient: &str) -> Vec<RawRecipe> {
        match ingredient {
            "chicken" => vec![raw("1", "Chicken Fried Rice"), raw("2", "Chicken Curry")],
            "rice" => vec![raw("3", "Kedgeree"), raw("1", "Chicken Fried Rice")],
            "tofu" => vec![raw("4", "Mapo Tofu"), raw("3", "Kedgeree")],
            "beans" => vec![raw("5", "Bean Chili")],
            _ => Vec::new(),
        }
    }

    #[test]
    fn test_search_terms_without_vegetarian() {
        let terms = search_terms(&strings(&["chicken", "rice"]), &[DietaryTag::Vegan]);
        assert_eq!(terms, strings(&["chicken", "rice"]));
    }

    #[test]
    fn test_search_terms_vegetarian_widening() {
        let terms = search_terms(&strings(&["rice"]), &[DietaryTag::Vegetarian]);
        assert_eq!(terms, strings(&["rice", "tofu", "beans"]));
    }

    #[test]
    fn test_search_terms_widening_skips_requested() {
        let terms = search_terms(&strings(&["tofu", "rice"]), &[DietaryTag::Vegetarian]);
        assert_eq!(terms, strings(&["tofu", "rice", "beans"]));
    }

    #[test]
    fn test_merge_dedupes_and_keeps_discovery_order() {
        let merged = merge(vec![
            ("chicken".to_string(), fixture_catalog("chicken")),
            ("rice".to_string(), fixture_catalog("rice")),
        ]);

        let ids: Vec<&str> = merged.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(merged[0].found_ingredients(), ["chicken", "rice"]);
        assert_eq!(merged[1].found_ingredients(), ["chicken"]);
        assert_eq!(merged[2].found_ingredients(), ["rice"]);
    }

    #[test]
    fn test_merge_same_recipe_twice_for_one_ingredient() {
        let merged = merge(vec![(
            "rice".to_string(),
            vec![raw("3", "Kedgeree"), raw("3", "Kedgeree")],
        )]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].found_ingredients(), ["rice"]);
    }

    #[tokio::test]
    async fn test_aggregate_calls_catalog_once_per_ingredient() {
        let mut catalog = MockRecipeCatalog::new();
        catalog
            .expect_fetch_by_ingredient()
            .times(2)
            .returning(fixture_catalog);

        let candidates = aggregate(Arc::new(catalog), &strings(&["chicken", "rice"]), &[])
            .await
            .unwrap();

        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].match_count(), 2);
    }

    #[tokio::test]
    async fn test_aggregate_vegetarian_adds_two_lookups() {
        let mut catalog = MockRecipeCatalog::new();
        catalog
            .expect_fetch_by_ingredient()
            .times(3)
            .returning(fixture_catalog);

        let candidates = aggregate(
            Arc::new(catalog),
            &strings(&["rice"]),
            &[DietaryTag::Vegetarian],
        )
        .await
        .unwrap();

        let ids: Vec<&str> = candidates.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["3", "1", "4", "5"]);
        assert_eq!(candidates[0].found_ingredients(), ["rice", "tofu"]);
    }

    #[tokio::test]
    async fn test_aggregate_found_ingredients_are_requested_terms() {
        let mut catalog = MockRecipeCatalog::new();
        catalog
            .expect_fetch_by_ingredient()
            .returning(fixture_catalog);

        let requested = strings(&["chicken", "rice", "saffron"]);
        let candidates = aggregate(Arc::new(catalog), &requested, &[]).await.unwrap();

        let mut seen = HashSet::new();
        for candidate in &candidates {
            assert!(seen.insert(candidate.id().to_string()), "duplicate id");
            for ingredient in candidate.found_ingredients() {
                assert!(requested.contains(ingredient));
            }
        }
    }

    #[tokio::test]
    async fn test_aggregate_all_lookups_empty_is_not_an_error() {
        let mut catalog = MockRecipeCatalog::new();
        catalog
            .expect_fetch_by_ingredient()
            .times(2)
            .returning(|_| Vec::new());

        let candidates = aggregate(Arc::new(catalog), &strings(&["a", "b"]), &[])
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    /// Panics for one term, standing in for a catalog bug
    struct FaultyCatalog {
        faulty_term: Option<&'static str>,
    }

    #[async_trait::async_trait]
    impl RecipeCatalog for FaultyCatalog {
        async fn fetch_by_ingredient(&self, ingredient: &str) -> Vec<RawRecipe> {
            match self.faulty_term {
                Some(term) if term != ingredient => fixture_catalog(ingredient),
                _ => panic!("catalog bug for {}", ingredient),
            }
        }
    }

    #[tokio::test]
    async fn test_aggregate_survives_one_failed_task() {
        let catalog = FaultyCatalog {
            faulty_term: Some("rice"),
        };

        let candidates = aggregate(Arc::new(catalog), &strings(&["chicken", "rice"]), &[])
            .await
            .unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.found_ingredients() == ["chicken"]));
    }

    #[tokio::test]
    async fn test_aggregate_all_tasks_failed_is_catalog_error() {
        let catalog = FaultyCatalog { faulty_term: None };

        let result = aggregate(Arc::new(catalog), &strings(&["chicken"]), &[]).await;
        assert!(matches!(result, Err(AppError::Catalog(_))));
    }

    /// Takes a fixed time per lookup
    struct SlowCatalog {
        delay: std::time::Duration,
    }

    #[async_trait::async_trait]
    impl RecipeCatalog for SlowCatalog {
        async fn fetch_by_ingredient(&self, ingredient: &str) -> Vec<RawRecipe> {
            tokio::time::sleep(self.delay).await;
            vec![raw(&format!("{}-1", ingredient), &format!("{} bake", ingredient))]
        }
    }

    #[tokio::test]
    async fn test_aggregate_lookups_run_concurrently() {
        let delay = std::time::Duration::from_millis(200);
        let catalog = SlowCatalog { delay };
        let requested = strings(&["chicken", "rice", "leek", "potato", "carrot"]);

        let start = Instant::now();
        let candidates = aggregate(Arc::new(catalog), &requested, &[]).await.unwrap();
        let elapsed = start.elapsed();

        // Sequential lookups would need 5 x 200ms
        assert!(elapsed < delay * 3, "aggregation took {:?}", elapsed);

        let ids: Vec<&str> = candidates.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["chicken-1", "rice-1", "leek-1", "potato-1", "carrot-1"]);
    }
}
