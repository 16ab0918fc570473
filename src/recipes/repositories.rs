use async_trait::async_trait;

use super::entities::{Recipe, UnitOfMeasure};
use super::value_objects::{RecipeId, UnitId};

/// Lightweight snapshot returned by recipe store lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeSnapshot {
    /// Full recipe aggregate.
    pub recipe: Recipe,
}

impl From<Recipe> for RecipeSnapshot {
    fn from(recipe: Recipe) -> Self {
        Self { recipe }
    }
}

/// Summary DTO for listing recipes without exposing the full aggregate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipeSummary {
    /// Identifier of the recipe.
    pub id: RecipeId,
    /// Optional title for display purposes.
    pub title: Option<String>,
    /// Number of owned ingredients.
    pub ingredient_count: usize,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id(),
            title: recipe.title().map(|title| title.to_string()),
            ingredient_count: recipe.ingredient_count(),
        }
    }
}

/// Contract describing persistence responsibilities for recipe aggregates.
#[async_trait]
pub trait RecipeStore {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Retrieves a stored recipe by identifier.
    ///
    /// Implementors must return `Ok(None)` when the recipe is missing.
    async fn find_by_id(&self, id: RecipeId) -> Result<Option<RecipeSnapshot>, Self::Error>;

    /// Persists the full aggregate, ingredient collection included.
    ///
    /// Implementors must assign identifiers to pending children before
    /// returning and hand back the canonical persisted form, so callers know
    /// every identifier synchronously after a save. A save of an unknown
    /// recipe inserts it.
    async fn save(&self, recipe: Recipe) -> Result<Recipe, Self::Error>;

    /// Loads every stored recipe.
    async fn find_all(&self) -> Result<Vec<Recipe>, Self::Error>;
}

/// Contract describing lookups against the unit-of-measure reference data.
#[async_trait]
pub trait UnitOfMeasureStore {
    /// Associated error type allowing infrastructure specific failures.
    type Error;

    /// Retrieves a unit of measure by identifier.
    ///
    /// Implementors must return `Ok(None)` when the unit is missing.
    async fn find_by_id(&self, id: UnitId) -> Result<Option<UnitOfMeasure>, Self::Error>;
}
