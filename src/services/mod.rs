pub mod aggregator;
pub mod catalog;
pub mod dietary;
pub mod refinement;
pub mod search;

pub use catalog::{MealDbCatalog, RecipeCatalog};
pub use refinement::RecipeRefiner;
