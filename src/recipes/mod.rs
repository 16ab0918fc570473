//! Core recipe domain primitives and contracts.
//!
//! The module defines value objects, the recipe aggregate and the traits that
//! describe the required persistence behavior, independently from transport
//! concerns. Store adapters live behind the [`repositories`] contracts; the
//! [`service`] module wires them together and carries the ingredient
//! update-or-append logic.

pub mod commands;
pub mod entities;
pub mod repositories;
pub mod service;
pub mod value_objects;

pub use commands::{IngredientCommand, IngredientView};
pub use entities::{Ingredient, Recipe, RecipeError, UnitOfMeasure};
pub use repositories::{RecipeSnapshot, RecipeStore, RecipeSummary, UnitOfMeasureStore};
pub use service::{RecipeService, RecipeServiceError, RecipeStoreHandle, UnitStoreHandle};
pub use value_objects::{Amount, AmountError, IdError, IngredientId, RecipeId, UnitId};
