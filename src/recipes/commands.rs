use serde::{Deserialize, Serialize};

use super::entities::Ingredient;
use super::value_objects::{Amount, IngredientId, RecipeId, UnitId};

/// Detached change request for an ingredient within a recipe.
///
/// Carries the unit of measure by identifier only; the service resolves it at
/// save time. A request without an ingredient identifier always appends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientCommand {
    /// Identifier of the ingredient to update, absent for a new ingredient.
    #[serde(default)]
    pub id: Option<IngredientId>,
    /// Identifier of the owning recipe.
    pub recipe_id: RecipeId,
    /// Replacement description.
    pub description: String,
    /// Replacement quantity.
    pub amount: Amount,
    /// Identifier of the unit of measure to resolve.
    pub uom_id: UnitId,
}

/// Read model describing a persisted ingredient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientView {
    /// Store-assigned ingredient identifier.
    pub id: IngredientId,
    /// Identifier of the owning recipe.
    pub recipe_id: RecipeId,
    /// Current description.
    pub description: String,
    /// Current quantity.
    pub amount: Amount,
    /// Identifier of the resolved unit of measure.
    pub uom_id: UnitId,
    /// Description of the resolved unit of measure.
    pub uom_description: String,
}

impl IngredientView {
    /// Builds a view from a persisted child, or `None` when the child has no
    /// identifier yet.
    #[must_use]
    pub fn from_ingredient(recipe: RecipeId, ingredient: &Ingredient) -> Option<Self> {
        let id = ingredient.id()?;
        Some(Self {
            id,
            recipe_id: recipe,
            description: ingredient.description().to_owned(),
            amount: ingredient.amount().clone(),
            uom_id: ingredient.uom().id(),
            uom_description: ingredient.uom().description().to_owned(),
        })
    }
}
