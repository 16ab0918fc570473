use std::{
    collections::{BTreeMap, BTreeSet},
    num::NonZeroU64,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tracing::{debug, error};

use crate::{
    config::{StoreBackend, StoreSettings, UnitSeed},
    recipes::{
        commands::{IngredientCommand, IngredientView},
        entities::{Ingredient, Recipe, RecipeError, UnitOfMeasure},
        repositories::{RecipeSnapshot, RecipeStore, RecipeSummary, UnitOfMeasureStore},
        value_objects::{IdError, IngredientId, RecipeId, UnitId},
    },
};

/// Type alias simplifying recipe store trait object usage inside the service.
pub type RecipeStoreHandle = dyn RecipeStore<Error = RecipeServiceError> + Send + Sync + 'static;
/// Type alias simplifying unit store trait object usage inside the service.
pub type UnitStoreHandle =
    dyn UnitOfMeasureStore<Error = RecipeServiceError> + Send + Sync + 'static;

/// High level recipe service wiring the store adapters together.
///
/// Every operation runs as one read-modify-write sequence against the recipe
/// store; atomicity of that sequence is the store adapter's responsibility.
#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<RecipeStoreHandle>,
    units: Arc<UnitStoreHandle>,
}

impl std::fmt::Debug for RecipeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeService").finish_non_exhaustive()
    }
}

impl RecipeService {
    /// Creates a new [`RecipeService`] from trait object handles.
    pub fn new(recipes: Arc<RecipeStoreHandle>, units: Arc<UnitStoreHandle>) -> Self {
        Self { recipes, units }
    }

    /// Builds a service instance from configuration settings.
    pub fn from_config(settings: &StoreSettings) -> Result<Self, RecipeServiceError> {
        let store = match settings.backend {
            StoreBackend::InMemory => Arc::new(InMemoryStore::default()),
        };
        let recipes = Arc::new(InMemoryRecipeStore::new(store.clone()));
        let units = InMemoryUnitStore::new(store);
        units.preload(&settings.units)?;
        Ok(Self::new(recipes, Arc::new(units)))
    }

    /// Returns a clone of the recipe store handle.
    pub fn recipe_store(&self) -> Arc<RecipeStoreHandle> {
        Arc::clone(&self.recipes)
    }

    /// Returns a clone of the unit store handle.
    pub fn unit_store(&self) -> Arc<UnitStoreHandle> {
        Arc::clone(&self.units)
    }

    /// Saves an ingredient change against its recipe, updating the matching
    /// child in place or appending a new one.
    ///
    /// A command whose identifier matches an existing child mutates it and
    /// preserves its identity; any other command appends. After the save the
    /// affected child is located by identifier: the updated one directly, an
    /// appended one by the identifier the store assigned during the save.
    /// Stores that fail to report assigned identifiers fall back to matching
    /// on the conjunction of description, amount and unit, which picks the
    /// lowest identifier when several children carry identical fields.
    pub async fn save_ingredient(
        &self,
        command: IngredientCommand,
    ) -> Result<IngredientView, RecipeServiceError> {
        let Some(snapshot) = self.recipes.find_by_id(command.recipe_id).await? else {
            error!(recipe = %command.recipe_id, "recipe not found for ingredient save");
            return Err(RecipeServiceError::recipe_not_found(command.recipe_id));
        };
        let mut recipe = snapshot.recipe;

        let Some(uom) = self.units.find_by_id(command.uom_id).await? else {
            error!(unit = %command.uom_id, "unit of measure not found");
            return Err(RecipeServiceError::unit_not_found(command.uom_id));
        };

        let target = command
            .id
            .filter(|id| recipe.ingredient(*id).is_some());
        match target {
            Some(id) => {
                debug!(recipe = %recipe.id(), ingredient = %id, "updating ingredient");
                if let Some(existing) = recipe.ingredient_mut(id) {
                    existing.set_description(command.description.clone());
                    existing.set_amount(command.amount.clone());
                    existing.set_uom(uom);
                }
            }
            None => {
                debug!(recipe = %recipe.id(), "appending ingredient");
                recipe.attach(Ingredient::new(
                    command.description.clone(),
                    command.amount.clone(),
                    uom,
                ))?;
            }
        }

        let known: BTreeSet<IngredientId> =
            recipe.ingredients().filter_map(Ingredient::id).collect();
        let saved = self.recipes.save(recipe).await?;

        let resolved = match target {
            Some(id) => saved.ingredient(id),
            None => saved
                .ingredients()
                .find(|ingredient| ingredient.id().is_some_and(|id| !known.contains(&id))),
        }
        .or_else(|| saved.find_matching(&command.description, &command.amount, command.uom_id));
        let Some(resolved) = resolved else {
            error!(recipe = %saved.id(), "saved ingredient could not be located");
            return Err(RecipeServiceError::unresolved(saved.id()));
        };

        IngredientView::from_ingredient(saved.id(), resolved)
            .ok_or_else(|| RecipeServiceError::unresolved(saved.id()))
    }

    /// Looks up a single ingredient within a recipe.
    pub async fn find_ingredient(
        &self,
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
    ) -> Result<IngredientView, RecipeServiceError> {
        let Some(snapshot) = self.recipes.find_by_id(recipe_id).await? else {
            error!(recipe = %recipe_id, "recipe not found");
            return Err(RecipeServiceError::recipe_not_found(recipe_id));
        };
        let Some(ingredient) = snapshot.recipe.ingredient(ingredient_id) else {
            error!(recipe = %recipe_id, ingredient = %ingredient_id, "ingredient not found");
            return Err(RecipeServiceError::ingredient_not_found(
                recipe_id,
                ingredient_id,
            ));
        };
        IngredientView::from_ingredient(recipe_id, ingredient)
            .ok_or_else(|| RecipeServiceError::ingredient_not_found(recipe_id, ingredient_id))
    }

    /// Removes an ingredient from a recipe.
    ///
    /// Deleting a missing recipe or a missing ingredient is a no-op, so the
    /// operation can be retried freely.
    pub async fn delete_ingredient(
        &self,
        recipe_id: RecipeId,
        ingredient_id: IngredientId,
    ) -> Result<(), RecipeServiceError> {
        debug!(recipe = %recipe_id, ingredient = %ingredient_id, "deleting ingredient");
        let Some(snapshot) = self.recipes.find_by_id(recipe_id).await? else {
            debug!(recipe = %recipe_id, "recipe not found, nothing to delete");
            return Ok(());
        };
        let mut recipe = snapshot.recipe;
        if recipe.detach(ingredient_id).is_none() {
            debug!(recipe = %recipe_id, ingredient = %ingredient_id, "ingredient not found, nothing to delete");
            return Ok(());
        }
        self.recipes.save(recipe).await?;
        Ok(())
    }

    /// Lists every stored recipe as a summary, deduplicated by identifier.
    pub async fn list_recipes(&self) -> Result<Vec<RecipeSummary>, RecipeServiceError> {
        let recipes = self.recipes.find_all().await?;
        let mut summaries: BTreeMap<RecipeId, RecipeSummary> = BTreeMap::new();
        for recipe in &recipes {
            summaries.insert(recipe.id(), RecipeSummary::from(recipe));
        }
        Ok(summaries.into_values().collect())
    }
}

/// Errors raised by recipe service operations and store adapters.
#[derive(Debug, thiserror::Error)]
pub enum RecipeServiceError {
    /// Referenced recipe was not found.
    #[error("recipe `{recipe}` not found")]
    RecipeNotFound { recipe: RecipeId },
    /// Referenced ingredient was not found in the recipe.
    #[error("ingredient `{ingredient}` not found in recipe `{recipe}`")]
    IngredientNotFound {
        recipe: RecipeId,
        ingredient: IngredientId,
    },
    /// Referenced unit of measure was not found.
    #[error("unit of measure `{unit}` not found")]
    UnitNotFound { unit: UnitId },
    /// A saved ingredient could not be located in the persisted aggregate.
    #[error("saved ingredient could not be located in recipe `{recipe}`")]
    IngredientUnresolved { recipe: RecipeId },
    /// Domain validation failed when mutating the recipe aggregate.
    #[error("domain error: {0}")]
    Domain(#[from] RecipeError),
    /// A configured unit seed carried an invalid identifier.
    #[error("invalid unit seed: {0}")]
    Seed(#[from] IdError),
}

impl RecipeServiceError {
    fn recipe_not_found(recipe: RecipeId) -> Self {
        Self::RecipeNotFound { recipe }
    }

    fn ingredient_not_found(recipe: RecipeId, ingredient: IngredientId) -> Self {
        Self::IngredientNotFound { recipe, ingredient }
    }

    fn unit_not_found(unit: UnitId) -> Self {
        Self::UnitNotFound { unit }
    }

    fn unresolved(recipe: RecipeId) -> Self {
        Self::IngredientUnresolved { recipe }
    }
}

#[derive(Default)]
struct InMemoryStore {
    recipes: Mutex<BTreeMap<RecipeId, Recipe>>,
    units: Mutex<BTreeMap<UnitId, UnitOfMeasure>>,
    next_ingredient_id: Mutex<u64>,
}

impl InMemoryStore {
    fn recipes_guard(&self) -> std::sync::MutexGuard<'_, BTreeMap<RecipeId, Recipe>> {
        self.recipes.lock().expect("in-memory recipe store poisoned")
    }

    fn units_guard(&self) -> std::sync::MutexGuard<'_, BTreeMap<UnitId, UnitOfMeasure>> {
        self.units.lock().expect("in-memory unit store poisoned")
    }

    fn allocate_ingredient_id(&self) -> IngredientId {
        let mut next = self
            .next_ingredient_id
            .lock()
            .expect("ingredient id sequence poisoned");
        let previous = *next;
        *next += 1;
        IngredientId::from(NonZeroU64::MIN.saturating_add(previous))
    }
}

#[derive(Clone)]
struct InMemoryRecipeStore {
    store: Arc<InMemoryStore>,
}

impl InMemoryRecipeStore {
    fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    type Error = RecipeServiceError;

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<RecipeSnapshot>, Self::Error> {
        let guard = self.store.recipes_guard();
        Ok(guard.get(&id).cloned().map(RecipeSnapshot::from))
    }

    async fn save(&self, mut recipe: Recipe) -> Result<Recipe, Self::Error> {
        // Identifier assignment happens under the store lock so a save is
        // atomic with respect to other operations on the same store.
        let mut guard = self.store.recipes_guard();
        recipe.assign_identifiers(|| self.store.allocate_ingredient_id())?;
        guard.insert(recipe.id(), recipe.clone());
        Ok(recipe)
    }

    async fn find_all(&self) -> Result<Vec<Recipe>, Self::Error> {
        let guard = self.store.recipes_guard();
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Clone)]
struct InMemoryUnitStore {
    store: Arc<InMemoryStore>,
}

impl InMemoryUnitStore {
    fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    fn preload(&self, seeds: &[UnitSeed]) -> Result<(), RecipeServiceError> {
        let mut guard = self.store.units_guard();
        for seed in seeds {
            let id = UnitId::new(seed.id)?;
            guard.insert(id, UnitOfMeasure::new(id, seed.description.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfMeasureStore for InMemoryUnitStore {
    type Error = RecipeServiceError;

    async fn find_by_id(&self, id: UnitId) -> Result<Option<UnitOfMeasure>, Self::Error> {
        let guard = self.store.units_guard();
        Ok(guard.get(&id).cloned())
    }
}
