pub mod lenient;
pub mod recipe;
pub mod search;

pub use recipe::{CandidateRecipe, MealDbFilterResponse, Named, RawRecipe, RefinedRecipe};
pub use search::{
    CookingTime, DietaryTag, Mood, SearchContext, SearchParams, SearchQuery, SearchResponse,
    SkillLevel,
};
