//! Recipe and ingredient management core.
//!
//! The crate exposes a small service layer over two persistence contracts: a
//! recipe store holding the aggregate and a unit-of-measure store holding
//! reference data. In-memory adapters back both by default; transports and
//! real databases plug in through the [`recipes::repositories`] traits.

pub mod config;
pub mod logger;
pub mod recipes;

pub use recipes::{
    IngredientCommand, IngredientView, RecipeService, RecipeServiceError, RecipeSummary,
};
