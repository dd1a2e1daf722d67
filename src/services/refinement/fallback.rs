//! Deterministic ranking used whenever the generative service is skipped or
//! fails. Never touches the network.

use std::cmp::Reverse;

use crate::{
    models::{CandidateRecipe, Mood, RefinedRecipe, SearchContext},
    services::dietary,
};

use super::MAX_REFINED_RECIPES;

/// Upper bound applied to the user's time budget when annotating a recipe
const ESTIMATED_TIME_CAP: u32 = 45;

pub const SUGGESTION_ID: &str = "suggestion_1";
pub const SUGGESTION_THUMBNAIL: &str = "https://via.placeholder.com/300x200?text=Recipe+Suggestion";

/// Short mood annotation attached to each recipe
pub fn mood_description(mood: Option<&Mood>) -> &'static str {
    match mood {
        Some(Mood::Comfort) => "Perfect comfort food",
        Some(Mood::Healthy) => "Healthy and nutritious",
        Some(Mood::Quick) => "Quick and easy",
        Some(Mood::Fancy) => "Elegant dinner option",
        Some(Mood::Experimental) => "Try something new",
        Some(Mood::Nostalgic) => "Comforting classic",
        Some(Mood::Other(_)) | None => "Great choice",
    }
}

/// Dish name for the placeholder returned when the catalog had nothing
pub fn suggestion_name(mood: Option<&Mood>) -> &'static str {
    match mood {
        Some(Mood::Quick) => "Quick Stir Fry",
        Some(Mood::Comfort) => "Hearty Soup",
        Some(Mood::Healthy) => "Fresh Salad Bowl",
        Some(Mood::Fancy) => "Gourmet Pasta",
        _ => "Delicious Home Cooking",
    }
}

/// Ranks candidates by how many requested ingredients they matched.
///
/// With no candidates at all, returns a single context-based placeholder so
/// the client always has something to show.
pub fn refine(
    candidates: &[CandidateRecipe],
    ingredients: &[String],
    context: &SearchContext,
) -> Vec<RefinedRecipe> {
    if candidates.is_empty() {
        return vec![suggestion(ingredients, context)];
    }

    let matched: Vec<&CandidateRecipe> = candidates
        .iter()
        .filter(|candidate| candidate.match_count() > 0)
        .collect();
    let mut ranked = dietary::filter(matched, &context.dietary);

    // Stable, so ties keep discovery order
    ranked.sort_by_key(|candidate| Reverse(candidate.match_count()));

    ranked
        .into_iter()
        .take(MAX_REFINED_RECIPES)
        .map(|candidate| annotate(candidate, context))
        .collect()
}

fn annotate(candidate: &CandidateRecipe, context: &SearchContext) -> RefinedRecipe {
    let mut refined = RefinedRecipe::from(candidate);

    if let Some(cooking_time) = &context.cooking_time {
        refined.estimated_time = Some(cooking_time.minutes_or_default().min(ESTIMATED_TIME_CAP));
    }

    if let Some(mood) = &context.mood {
        refined.mood_match = Some(mood_description(Some(mood)).to_string());
    }

    refined.perfect_match = candidate.match_count() >= 2
        && context.mood.is_some()
        && context.cooking_time.is_some();

    refined
}

fn suggestion(ingredients: &[String], context: &SearchContext) -> RefinedRecipe {
    RefinedRecipe {
        id: SUGGESTION_ID.to_string(),
        name: suggestion_name(context.mood.as_ref()).to_string(),
        thumbnail: SUGGESTION_THUMBNAIL.to_string(),
        found_ingredients: ingredients.iter().take(2).cloned().collect(),
        ingredient_count: ingredients.len(),
        estimated_time: Some(
            context
                .cooking_time
                .as_ref()
                .map_or(30, |cooking_time| cooking_time.minutes_or_default()),
        ),
        mood_match: Some(mood_description(context.mood.as_ref()).to_string()),
        perfect_match: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CookingTime, DietaryTag, RawRecipe};

    fn candidate(id: &str, name: &str, found: &[&str]) -> CandidateRecipe {
        let mut candidate = CandidateRecipe::new(
            RawRecipe {
                id: id.to_string(),
                name: name.to_string(),
                thumbnail: format!("https://www.themealdb.com/images/media/meals/{}.jpg", id),
            },
            found[0],
        );
        for ingredient in &found[1..] {
            candidate.add_found_ingredient(ingredient);
        }
        candidate
    }

    fn context(mood: Option<Mood>, cooking_time: Option<&str>) -> SearchContext {
        SearchContext {
            mood,
            cooking_time: cooking_time.map(CookingTime::new),
            ..SearchContext::default()
        }
    }

    fn sample() -> Vec<CandidateRecipe> {
        vec![
            candidate("1", "Kedgeree", &["rice"]),
            candidate("2", "Chicken Fried Rice", &["chicken", "rice", "egg"]),
            candidate("3", "Egg Drop Soup", &["egg"]),
            candidate("4", "Chicken Congee", &["chicken", "rice"]),
        ]
    }

    fn ingredients() -> Vec<String> {
        vec!["chicken".to_string(), "rice".to_string(), "egg".to_string()]
    }

    #[test]
    fn test_sorted_by_match_count_with_stable_ties() {
        let refined = refine(&sample(), &ingredients(), &SearchContext::default());
        let ids: Vec<&str> = refined.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_no_context_means_no_annotations() {
        let refined = refine(&sample(), &ingredients(), &SearchContext::default());
        for recipe in &refined {
            assert_eq!(recipe.mood_match, None);
            assert_eq!(recipe.estimated_time, None);
            assert!(!recipe.perfect_match);
            assert_eq!(recipe.ingredient_count, recipe.found_ingredients.len());
        }
    }

    #[test]
    fn test_thumbnails_propagated_unchanged() {
        let candidates = sample();
        let refined = refine(&candidates, &ingredients(), &SearchContext::default());
        for recipe in &refined {
            let source = candidates.iter().find(|c| c.id() == recipe.id).unwrap();
            assert_eq!(recipe.thumbnail, source.recipe.thumbnail);
        }
    }

    #[test]
    fn test_estimated_time_capped() {
        let refined = refine(&sample(), &ingredients(), &context(None, Some("90+")));
        assert!(refined.iter().all(|r| r.estimated_time == Some(45)));

        let refined = refine(&sample(), &ingredients(), &context(None, Some("15")));
        assert!(refined.iter().all(|r| r.estimated_time == Some(15)));

        let refined = refine(&sample(), &ingredients(), &context(None, Some("soon")));
        assert!(refined.iter().all(|r| r.estimated_time == Some(30)));
    }

    #[test]
    fn test_mood_annotation() {
        let refined = refine(&sample(), &ingredients(), &context(Some(Mood::Fancy), None));
        assert!(refined
            .iter()
            .all(|r| r.mood_match.as_deref() == Some("Elegant dinner option")));

        let refined = refine(
            &sample(),
            &ingredients(),
            &context(Some(Mood::Other("sleepy".to_string())), None),
        );
        assert_eq!(refined[0].mood_match.as_deref(), Some("Great choice"));
    }

    #[test]
    fn test_perfect_match_needs_all_three_criteria() {
        let refined = refine(
            &sample(),
            &ingredients(),
            &context(Some(Mood::Comfort), Some("30")),
        );
        for recipe in &refined {
            assert_eq!(recipe.perfect_match, recipe.found_ingredients.len() >= 2);
        }

        let refined = refine(&sample(), &ingredients(), &context(Some(Mood::Comfort), None));
        assert!(refined.iter().all(|r| !r.perfect_match));

        let refined = refine(&sample(), &ingredients(), &context(None, Some("30")));
        assert!(refined.iter().all(|r| !r.perfect_match));
    }

    #[test]
    fn test_truncated_to_eight() {
        let candidates: Vec<CandidateRecipe> = (0..12)
            .map(|i| candidate(&i.to_string(), &format!("Rice Dish {}", i), &["rice"]))
            .collect();

        let refined = refine(&candidates, &ingredients(), &SearchContext::default());
        assert_eq!(refined.len(), MAX_REFINED_RECIPES);
        assert_eq!(refined[0].id, "0");
        assert_eq!(refined[7].id, "7");
    }

    #[test]
    fn test_output_properties_hold() {
        let ctx = context(Some(Mood::Quick), Some("20"));
        let refined = refine(&sample(), &ingredients(), &ctx);

        assert!(refined.len() <= MAX_REFINED_RECIPES);
        for pair in refined.windows(2) {
            assert!(pair[0].found_ingredients.len() >= pair[1].found_ingredients.len());
        }
        for recipe in &refined {
            if recipe.perfect_match {
                assert!(recipe.found_ingredients.len() >= 2);
            }
        }
    }

    #[test]
    fn test_dietary_applied() {
        let ctx = SearchContext {
            dietary: vec![DietaryTag::Vegetarian],
            ..SearchContext::default()
        };
        let refined = refine(&sample(), &ingredients(), &ctx);
        let ids: Vec<&str> = refined.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_empty_candidates_yield_comfort_placeholder() {
        let ctx = SearchContext {
            mood: Some(Mood::Comfort),
            cooking_time: Some(CookingTime::new("30")),
            dietary: vec![DietaryTag::Vegetarian],
            skill_level: None,
        };

        let refined = refine(&[], &[], &ctx);
        assert_eq!(refined.len(), 1);

        let placeholder = &refined[0];
        assert_eq!(placeholder.id, SUGGESTION_ID);
        assert_eq!(placeholder.name, "Hearty Soup");
        assert_eq!(placeholder.thumbnail, SUGGESTION_THUMBNAIL);
        assert_eq!(placeholder.estimated_time, Some(30));
        assert_eq!(placeholder.mood_match.as_deref(), Some("Perfect comfort food"));
        assert!(!placeholder.perfect_match);
        assert!(placeholder.found_ingredients.is_empty());
    }

    #[test]
    fn test_placeholder_uses_first_two_ingredients() {
        let refined = refine(&[], &ingredients(), &context(None, Some("90+")));
        let placeholder = &refined[0];
        assert_eq!(placeholder.name, "Delicious Home Cooking");
        assert_eq!(placeholder.found_ingredients, vec!["chicken", "rice"]);
        assert_eq!(placeholder.ingredient_count, 3);
        assert_eq!(placeholder.estimated_time, Some(90));
        assert_eq!(placeholder.mood_match.as_deref(), Some("Great choice"));
    }

    #[test]
    fn test_suggestion_names() {
        assert_eq!(suggestion_name(Some(&Mood::Quick)), "Quick Stir Fry");
        assert_eq!(suggestion_name(Some(&Mood::Healthy)), "Fresh Salad Bowl");
        assert_eq!(suggestion_name(Some(&Mood::Fancy)), "Gourmet Pasta");
        assert_eq!(suggestion_name(Some(&Mood::Nostalgic)), "Delicious Home Cooking");
        assert_eq!(suggestion_name(None), "Delicious Home Cooking");
    }
}
