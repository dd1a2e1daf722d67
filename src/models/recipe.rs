use serde::{Deserialize, Serialize};

use super::lenient;

/// Anything with a display name the dietary rules can classify
pub trait Named {
    fn name(&self) -> &str;
}

impl<T: Named + ?Sized> Named for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}

// ============================================================================
// TheMealDB Types
// ============================================================================

/// Recipe summary as returned by TheMealDB's filter endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecipe {
    #[serde(rename = "idMeal")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: String,
}

/// Envelope of `filter.php`; `meals` is `null` when nothing matched
#[derive(Debug, Deserialize)]
pub struct MealDbFilterResponse {
    #[serde(default)]
    pub meals: Option<Vec<RawRecipe>>,
}

impl Named for RawRecipe {
    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Pipeline Types
// ============================================================================

/// A catalog recipe plus the requested ingredients that surfaced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRecipe {
    #[serde(flatten)]
    pub recipe: RawRecipe,
    #[serde(rename = "foundIngredients")]
    found_ingredients: Vec<String>,
}

impl CandidateRecipe {
    pub fn new(recipe: RawRecipe, ingredient: impl Into<String>) -> Self {
        Self {
            recipe,
            found_ingredients: vec![ingredient.into()],
        }
    }

    /// Records another ingredient that produced this recipe.
    ///
    /// Returns `false` when the ingredient was already recorded.
    pub fn add_found_ingredient(&mut self, ingredient: &str) -> bool {
        if self.found_ingredients.iter().any(|i| i == ingredient) {
            return false;
        }
        self.found_ingredients.push(ingredient.to_string());
        true
    }

    pub fn id(&self) -> &str {
        &self.recipe.id
    }

    pub fn found_ingredients(&self) -> &[String] {
        &self.found_ingredients
    }

    pub fn match_count(&self) -> usize {
        self.found_ingredients.len()
    }
}

impl Named for CandidateRecipe {
    fn name(&self) -> &str {
        &self.recipe.name
    }
}

/// Ranked, annotated recipe returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinedRecipe {
    #[serde(rename = "idMeal", deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(rename = "strMeal")]
    pub name: String,
    #[serde(rename = "strMealThumb", default)]
    pub thumbnail: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub found_ingredients: Vec<String>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub ingredient_count: usize,
    /// Minutes
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::minutes"
    )]
    pub estimated_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_match: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub perfect_match: bool,
}

impl From<&CandidateRecipe> for RefinedRecipe {
    fn from(candidate: &CandidateRecipe) -> Self {
        Self {
            id: candidate.recipe.id.clone(),
            name: candidate.recipe.name.clone(),
            thumbnail: candidate.recipe.thumbnail.clone(),
            found_ingredients: candidate.found_ingredients.clone(),
            ingredient_count: candidate.match_count(),
            estimated_time: None,
            mood_match: None,
            perfect_match: false,
        }
    }
}

impl Named for RefinedRecipe {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, name: &str) -> RawRecipe {
        RawRecipe {
            id: id.to_string(),
            name: name.to_string(),
            thumbnail: format!("https://www.themealdb.com/images/media/meals/{}.jpg", id),
        }
    }

    #[test]
    fn test_mealdb_filter_response_null_meals() {
        let response: MealDbFilterResponse = serde_json::from_str(r#"{"meals": null}"#).unwrap();
        assert!(response.meals.is_none());
    }

    #[test]
    fn test_mealdb_filter_response_deserialization() {
        let json = r#"{
            "meals": [
                {
                    "strMeal": "Chicken Congee",
                    "strMealThumb": "https://www.themealdb.com/images/media/meals/1529446352.jpg",
                    "idMeal": "52956"
                }
            ]
        }"#;

        let response: MealDbFilterResponse = serde_json::from_str(json).unwrap();
        let meals = response.meals.unwrap();
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "52956");
        assert_eq!(meals[0].name, "Chicken Congee");
    }

    #[test]
    fn test_candidate_rejects_duplicate_ingredient() {
        let mut candidate = CandidateRecipe::new(raw("1", "Chicken Rice"), "chicken");
        assert!(candidate.add_found_ingredient("rice"));
        assert!(!candidate.add_found_ingredient("chicken"));
        assert_eq!(candidate.found_ingredients(), ["chicken", "rice"]);
        assert_eq!(candidate.match_count(), 2);
    }

    #[test]
    fn test_candidate_serializes_flat() {
        let candidate = CandidateRecipe::new(raw("52772", "Teriyaki Chicken"), "chicken");
        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["idMeal"], "52772");
        assert_eq!(value["strMeal"], "Teriyaki Chicken");
        assert_eq!(value["foundIngredients"][0], "chicken");
    }

    #[test]
    fn test_refined_from_candidate_preserves_thumbnail() {
        let candidate = CandidateRecipe::new(raw("52772", "Teriyaki Chicken"), "chicken");
        let refined = RefinedRecipe::from(&candidate);
        assert_eq!(refined.thumbnail, candidate.recipe.thumbnail);
        assert_eq!(refined.ingredient_count, 1);
        assert!(!refined.perfect_match);
    }

    #[test]
    fn test_refined_omits_absent_annotations() {
        let candidate = CandidateRecipe::new(raw("1", "Kedgeree"), "rice");
        let value = serde_json::to_value(RefinedRecipe::from(&candidate)).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("estimatedTime"));
        assert!(!object.contains_key("moodMatch"));
        assert_eq!(object["perfectMatch"], false);
        assert_eq!(object["ingredientCount"], 1);
    }

    #[test]
    fn test_refined_lenient_deserialization() {
        let json = r#"{
            "idMeal": 52772,
            "strMeal": "Teriyaki Chicken Casserole",
            "strMealThumb": "https://www.themealdb.com/images/media/meals/wvpsxx1468256321.jpg",
            "foundIngredients": null,
            "estimatedTime": "35 minutes",
            "moodMatch": "Perfect comfort food",
            "perfectMatch": null
        }"#;

        let refined: RefinedRecipe = serde_json::from_str(json).unwrap();
        assert_eq!(refined.id, "52772");
        assert!(refined.found_ingredients.is_empty());
        assert_eq!(refined.ingredient_count, 0);
        assert_eq!(refined.estimated_time, Some(35));
        assert!(!refined.perfect_match);
    }
}
