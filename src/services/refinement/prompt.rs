use crate::models::{CandidateRecipe, DietaryTag, Mood, SearchContext};

/// Candidates beyond this many are not shown to the model
pub const MAX_PROMPT_CANDIDATES: usize = 20;

const SHAPE_EXAMPLE: &str = r#"[{"idMeal":"52772","strMeal":"Recipe Name","strMealThumb":"https://www.themealdb.com/images/media/meals/ustsqw1468250014.jpg","foundIngredients":["ingredient1"],"ingredientCount":1,"estimatedTime":30,"moodMatch":"Perfect for comfort food","perfectMatch":true}]"#;

fn mood_phrase(mood: &Mood) -> Option<&'static str> {
    match mood {
        Mood::Comfort => Some("that are comforting and hearty"),
        Mood::Healthy => Some("that are healthy and nutritious"),
        Mood::Quick => Some("that are quick and easy to prepare"),
        Mood::Fancy => Some("that are elegant and impressive"),
        Mood::Experimental => Some("that are unique and adventurous"),
        Mood::Nostalgic => Some("that are comforting and familiar"),
        Mood::Other(_) => None,
    }
}

fn hard_constraint(tag: &DietaryTag) -> Option<&'static str> {
    match tag {
        DietaryTag::Vegetarian => Some("(NO MEAT, POULTRY, OR FISH)"),
        DietaryTag::NonVegetarian => Some("(MUST INCLUDE MEAT, POULTRY, OR FISH)"),
        DietaryTag::Vegan => Some("(NO ANIMAL PRODUCTS AT ALL)"),
        _ => None,
    }
}

/// One sentence describing what the user is after
pub fn describe_context(ingredients: &[String], context: &SearchContext) -> String {
    let mut description = String::from("The user is looking for recipes");

    if let Some(phrase) = context.mood.as_ref().and_then(mood_phrase) {
        description.push(' ');
        description.push_str(phrase);
    }

    if let Some(cooking_time) = &context.cooking_time {
        let budget = match cooking_time.minutes() {
            Some(minutes) if cooking_time.is_open_ended() => format!("{}+ minutes", minutes),
            Some(minutes) => format!("{} minutes", minutes),
            None => cooking_time.to_string(),
        };
        description.push_str(&format!(", with about {} to cook", budget));
    }

    if let Some(skill_level) = &context.skill_level {
        description.push_str(&format!(", suitable for {} cooking skill level", skill_level));
    }

    if !context.dietary.is_empty() {
        let tags: Vec<&str> = context.dietary.iter().map(DietaryTag::as_str).collect();
        description.push_str(&format!(", following {} dietary preferences", tags.join(" and ")));

        for constraint in context.dietary.iter().filter_map(hard_constraint) {
            description.push(' ');
            description.push_str(constraint);
        }
    }

    if !ingredients.is_empty() {
        description.push_str(&format!(
            ", using available ingredients: {}",
            ingredients.join(", ")
        ));
    }

    description
}

/// Builds the full generation prompt.
///
/// Candidates are listed one compact JSON object per line so names with
/// quotes survive intact.
pub fn build_prompt(
    candidates: &[CandidateRecipe],
    ingredients: &[String],
    context: &SearchContext,
) -> String {
    let recipe_lines: Vec<String> = candidates
        .iter()
        .take(MAX_PROMPT_CANDIDATES)
        .filter_map(|candidate| serde_json::to_string(candidate).ok())
        .collect();

    format!(
        "{context}.

Available recipes:
{recipes}

IMPORTANT: If dietary preferences include vegetarian, EXCLUDE all recipes with meat, poultry, fish, or seafood. If non-vegetarian is selected, ONLY INCLUDE recipes with meat, poultry, fish, or seafood. If vegan, EXCLUDE all animal products including dairy and eggs.

Return a JSON array with the best 6-8 recipes that match the user's needs and dietary restrictions. Include estimated cooking time in minutes and mood match info. PRESERVE the original idMeal and strMealThumb values exactly as provided:

{shape}

Focus on recipes that match the dietary restrictions, mood and time constraints. Only JSON, no explanation.",
        context = describe_context(ingredients, context),
        recipes = recipe_lines.join("\n"),
        shape = SHAPE_EXAMPLE,
    )
}
