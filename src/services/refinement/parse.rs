//! Parse-or-fallback handling of generated text.
//!
//! The model is told to answer with a bare JSON array but often wraps it in
//! prose or markdown fences. We look for balanced top-level arrays, in order,
//! and take the first one that decodes into recipe records.

use crate::models::RefinedRecipe;

/// Outcome of decoding the model's answer
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedRecipes {
    Parsed(Vec<RefinedRecipe>),
    Unparsable(String),
}

/// End index (exclusive) of the array opening at `start`, string-aware
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
            _ => {}
        }
    }

    None
}

/// Balanced top-level `[...]` spans, left to right
pub fn json_arrays(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(found) = text[cursor..].find('[') {
        let start = cursor + found;
        match balanced_end(text, start) {
            Some(end) => {
                spans.push(&text[start..end]);
                cursor = end;
            }
            None => break,
        }
    }

    spans
}

pub fn parse_recipes(text: &str) -> ParsedRecipes {
    let spans = json_arrays(text);
    if spans.is_empty() {
        return ParsedRecipes::Unparsable("no JSON array found in response".to_string());
    }

    let mut last_error = String::new();
    let mut saw_empty = false;
    for span in spans {
        match serde_json::from_str::<Vec<RefinedRecipe>>(span) {
            // An empty list mentioned in prose must not hide a real answer after it
            Ok(recipes) if recipes.is_empty() => saw_empty = true,
            Ok(mut recipes) => {
                for recipe in &mut recipes {
                    if recipe.ingredient_count == 0 {
                        recipe.ingredient_count = recipe.found_ingredients.len();
                    }
                }
                return ParsedRecipes::Parsed(recipes);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    if saw_empty {
        return ParsedRecipes::Parsed(Vec::new());
    }

    ParsedRecipes::Unparsable(last_error)
}
