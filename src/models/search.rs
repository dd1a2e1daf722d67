use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{lenient::leading_number, RefinedRecipe};
use crate::error::{AppError, AppResult};

/// Declares a lowercase string-backed enum that keeps unknown values.
///
/// Unknown values are not rejected: they flow into the refinement prompt
/// verbatim and fall through to the "else" branch of every lookup table.
macro_rules! open_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(value) => value.as_str(),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                let normalized = value.trim().to_lowercase();
                match normalized.as_str() {
                    $($text => $name::$variant,)+
                    _ => $name::Other(normalized),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

open_enum!(
    /// How the user wants the meal to feel
    Mood {
        Comfort => "comfort",
        Healthy => "healthy",
        Quick => "quick",
        Fancy => "fancy",
        Experimental => "experimental",
        Nostalgic => "nostalgic",
    }
);

open_enum!(
    SkillLevel {
        Beginner => "beginner",
        Intermediate => "intermediate",
        Advanced => "advanced",
    }
);

open_enum!(
    /// Dietary restriction requested by the user
    DietaryTag {
        Vegetarian => "vegetarian",
        NonVegetarian => "non-vegetarian",
        Vegan => "vegan",
        GlutenFree => "gluten-free",
        DairyFree => "dairy-free",
    }
);

/// Time budget token as sent by the client (`"15"`, `"30"`, `"90+"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookingTime(String);

impl CookingTime {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// Minutes encoded by the token, if it starts with a non-zero number
    pub fn minutes(&self) -> Option<u32> {
        leading_number(&self.0).filter(|m| *m > 0)
    }

    /// Minutes, or the 30 minute default for tokens that carry no number
    pub fn minutes_or_default(&self) -> u32 {
        self.minutes().unwrap_or(30)
    }

    pub fn is_open_ended(&self) -> bool {
        self.0.ends_with('+')
    }
}

impl Display for CookingTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Soft preferences that shape ranking and annotation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<CookingTime>,
    pub dietary: Vec<DietaryTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_level: Option<SkillLevel>,
}

/// Raw query string of `GET /api/recipes`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub ingredients: Option<String>,
    pub mood: Option<String>,
    pub cooking_time: Option<String>,
    pub dietary: Option<String>,
    pub skill_level: Option<String>,
}

/// Validated, normalized search request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchQuery {
    pub ingredients: Vec<String>,
    #[serde(flatten)]
    pub context: SearchContext,
}

impl SearchQuery {
    /// Normalizes the raw parameters and rejects a request with no criteria.
    ///
    /// Skill level alone does not count as a search criterion.
    pub fn from_params(params: SearchParams) -> AppResult<Self> {
        let ingredients = dedup(
            split_list(params.ingredients.as_deref())
                .map(|ingredient| ingredient.to_lowercase()),
        );
        let dietary = dedup(split_list(params.dietary.as_deref()).map(DietaryTag::from));

        let query = Self {
            ingredients,
            context: SearchContext {
                mood: non_empty(params.mood).map(Mood::from),
                cooking_time: non_empty(params.cooking_time).map(CookingTime::new),
                dietary,
                skill_level: non_empty(params.skill_level).map(SkillLevel::from),
            },
        };

        if !query.has_criteria() {
            return Err(AppError::InvalidInput(
                "Please provide at least one search criteria (ingredients, mood, cooking time, or dietary preferences)"
                    .to_string(),
            ));
        }

        Ok(query)
    }

    pub fn has_criteria(&self) -> bool {
        !self.ingredients.is_empty()
            || self.context.mood.is_some()
            || self.context.cooking_time.is_some()
            || !self.context.dietary.is_empty()
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

fn dedup<T: PartialEq>(items: impl Iterator<Item = T>) -> Vec<T> {
    let mut unique = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Body of a successful `GET /api/recipes`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub search_criteria: SearchQuery,
    /// Candidates aggregated from the catalog, before dietary filtering
    pub total_found: usize,
    pub refined_count: usize,
    pub recipes: Vec<RefinedRecipe>,
    pub timestamp: DateTime<Utc>,
}
