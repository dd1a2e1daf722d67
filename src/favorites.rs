/// Saved recipes
///
/// A user's favorites are loaded once from a store and written back after
/// every toggle. The store is passed in explicitly; nothing here is global.
use std::path::PathBuf;

use async_trait::async_trait;

use crate::{error::AppResult, models::RefinedRecipe};

/// Persistence for the favorites list
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn load(&self) -> AppResult<Vec<RefinedRecipe>>;

    async fn save(&self, recipes: &[RefinedRecipe]) -> AppResult<()>;
}

/// Favorites kept as a JSON array in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FavoritesStore for JsonFileStore {
    async fn load(&self) -> AppResult<Vec<RefinedRecipe>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No favorites file yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_str(&contents)?)
    }

    async fn save(&self, recipes: &[RefinedRecipe]) -> AppResult<()> {
        let serialized = serde_json::to_string_pretty(recipes)?;
        tokio::fs::write(&self.path, serialized).await?;
        Ok(())
    }
}

pub struct Favorites<S: FavoritesStore> {
    store: S,
    recipes: Vec<RefinedRecipe>,
}

impl<S: FavoritesStore> Favorites<S> {
    pub async fn load(store: S) -> AppResult<Self> {
        let recipes = store.load().await?;
        tracing::debug!(count = recipes.len(), "Loaded favorites");
        Ok(Self { store, recipes })
    }

    /// Adds the recipe, or removes it if already saved, then persists.
    ///
    /// Returns whether the recipe is a favorite afterwards. On a failed save
    /// the in-memory list is left unchanged.
    pub async fn toggle(&mut self, recipe: RefinedRecipe) -> AppResult<bool> {
        let mut updated = self.recipes.clone();
        let now_favorite = match updated.iter().position(|r| r.id == recipe.id) {
            Some(index) => {
                updated.remove(index);
                false
            }
            None => {
                updated.push(recipe);
                true
            }
        };

        self.store.save(&updated).await?;
        self.recipes = updated;
        Ok(now_favorite)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.recipes.iter().any(|r| r.id == id)
    }

    pub fn recipes(&self) -> &[RefinedRecipe] {
        &self.recipes
    }
}
