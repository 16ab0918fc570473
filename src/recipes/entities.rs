use std::collections::BTreeMap;

use thiserror::Error;

use super::value_objects::{Amount, IngredientId, RecipeId, UnitId};

/// Reference entity identifying the measurement unit of an ingredient amount.
///
/// Units are looked up by identifier only and never created or mutated here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitOfMeasure {
    id: UnitId,
    description: String,
}

impl UnitOfMeasure {
    /// Creates a new [`UnitOfMeasure`] with the supplied identifier.
    #[must_use]
    pub fn new(id: UnitId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    /// Returns the unit identifier.
    #[must_use]
    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Returns the human readable unit description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Child entity owned by a [`Recipe`].
///
/// The identifier stays absent until a store assigns one while committing the
/// owning aggregate. There is no back-reference to the recipe: membership in
/// the aggregate's collection is the ownership relation, and removal from that
/// collection is the single detachment operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ingredient {
    id: Option<IngredientId>,
    description: String,
    amount: Amount,
    uom: UnitOfMeasure,
}

impl Ingredient {
    /// Creates a not-yet-persisted ingredient.
    #[must_use]
    pub fn new(description: impl Into<String>, amount: Amount, uom: UnitOfMeasure) -> Self {
        Self {
            id: None,
            description: description.into(),
            amount,
            uom,
        }
    }

    /// Sets the store-assigned identifier.
    #[must_use]
    pub fn with_id(mut self, id: IngredientId) -> Self {
        self.id = Some(id);
        self
    }

    /// Returns the identifier, if one has been assigned.
    #[must_use]
    pub fn id(&self) -> Option<IngredientId> {
        self.id
    }

    /// Returns the ingredient description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the quantity of the ingredient.
    #[must_use]
    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    /// Returns the resolved unit of measure.
    #[must_use]
    pub fn uom(&self) -> &UnitOfMeasure {
        &self.uom
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replaces the quantity.
    pub fn set_amount(&mut self, amount: Amount) {
        self.amount = amount;
    }

    /// Replaces the unit of measure.
    pub fn set_uom(&mut self, uom: UnitOfMeasure) {
        self.uom = uom;
    }

    fn matches_fields(&self, description: &str, amount: &Amount, unit: UnitId) -> bool {
        self.description == description && &self.amount == amount && self.uom.id() == unit
    }
}

/// Aggregate root owning a collection of ingredients.
///
/// Identified children live in a map keyed by identifier so lookups do not
/// scan the collection. Children awaiting an identifier are kept apart until
/// [`Recipe::assign_identifiers`] moves them into the identified collection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipe {
    id: RecipeId,
    title: Option<String>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    pending: Vec<Ingredient>,
}

impl Recipe {
    /// Creates a new empty recipe aggregate.
    #[must_use]
    pub fn new(id: RecipeId) -> Self {
        Self {
            id,
            title: None,
            ingredients: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Sets a human readable title for the recipe.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Returns the recipe identifier.
    #[must_use]
    pub fn id(&self) -> RecipeId {
        self.id
    }

    /// Returns the optional title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Retrieves an identified ingredient.
    #[must_use]
    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    /// Retrieves an identified ingredient for in-place mutation.
    pub fn ingredient_mut(&mut self, id: IngredientId) -> Option<&mut Ingredient> {
        self.ingredients.get_mut(&id)
    }

    /// Adds an ingredient to the aggregate.
    ///
    /// An ingredient that already carries an identifier joins the identified
    /// collection directly; one without an identifier is queued until the next
    /// save assigns it one. Identifier collisions are rejected.
    pub fn attach(&mut self, ingredient: Ingredient) -> Result<(), RecipeError> {
        match ingredient.id() {
            Some(id) if self.ingredients.contains_key(&id) => {
                Err(RecipeError::DuplicateIngredient(id))
            }
            Some(id) => {
                self.ingredients.insert(id, ingredient);
                Ok(())
            }
            None => {
                self.pending.push(ingredient);
                Ok(())
            }
        }
    }

    /// Removes an ingredient from the aggregate, returning it when present.
    ///
    /// This is the only detachment operation; there is no separate
    /// back-reference to clear.
    pub fn detach(&mut self, id: IngredientId) -> Option<Ingredient> {
        self.ingredients.remove(&id)
    }

    /// Moves pending ingredients into the identified collection.
    ///
    /// Part of the persistence contract: store adapters call this while
    /// committing the aggregate so newly appended children have identifiers
    /// by the time the save returns. Returns the identifiers handed out, in
    /// assignment order.
    pub fn assign_identifiers(
        &mut self,
        mut alloc: impl FnMut() -> IngredientId,
    ) -> Result<Vec<IngredientId>, RecipeError> {
        let mut staged = BTreeMap::new();
        let mut assigned = Vec::with_capacity(self.pending.len());
        for ingredient in &self.pending {
            let id = alloc();
            if self.ingredients.contains_key(&id) || staged.contains_key(&id) {
                return Err(RecipeError::DuplicateIngredient(id));
            }
            staged.insert(id, ingredient.clone().with_id(id));
            assigned.push(id);
        }
        self.pending.clear();
        self.ingredients.append(&mut staged);
        Ok(assigned)
    }

    /// Iterates over every ingredient, identified children first.
    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values().chain(self.pending.iter())
    }

    /// Returns the number of owned ingredients, pending ones included.
    #[must_use]
    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len() + self.pending.len()
    }

    /// Finds an identified ingredient whose description, amount and unit all
    /// equal the supplied values.
    ///
    /// First match in identifier order wins, so two field-identical children
    /// resolve to the lower identifier. Callers relying on this must treat it
    /// as a heuristic, not a unique lookup.
    #[must_use]
    pub fn find_matching(
        &self,
        description: &str,
        amount: &Amount,
        unit: UnitId,
    ) -> Option<&Ingredient> {
        self.ingredients
            .values()
            .find(|ingredient| ingredient.matches_fields(description, amount, unit))
    }
}

/// Errors raised when manipulating a recipe aggregate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecipeError {
    /// Attempted to add an ingredient with an identifier already in use.
    #[error("ingredient `{0}` already exists in the recipe")]
    DuplicateIngredient(IngredientId),
}

#[cfg(test)]
mod tests {
    use super::{Ingredient, Recipe, RecipeError, UnitOfMeasure};
    use crate::recipes::value_objects::{Amount, IngredientId, RecipeId, UnitId};

    fn amount(text: &str) -> Amount {
        text.parse().expect("valid amount")
    }

    fn teaspoon() -> UnitOfMeasure {
        UnitOfMeasure::new(UnitId::new(5).expect("unit id"), "Teaspoon")
    }

    fn ingredient_id(value: u64) -> IngredientId {
        IngredientId::new(value).expect("ingredient id")
    }

    #[test]
    fn attach_queues_unidentified_ingredients() {
        let mut recipe = Recipe::new(RecipeId::new(1).expect("recipe id")).with_title("Bread");
        recipe
            .attach(Ingredient::new("Flour", amount("2"), teaspoon()))
            .expect("attach");
        assert_eq!(recipe.ingredient_count(), 1);
        assert!(recipe.ingredient(ingredient_id(1)).is_none());
        assert_eq!(recipe.title(), Some("Bread"));
    }

    #[test]
    fn attach_rejects_duplicate_identifiers() {
        let mut recipe = Recipe::new(RecipeId::new(1).expect("recipe id"));
        let flour = Ingredient::new("Flour", amount("2"), teaspoon()).with_id(ingredient_id(10));
        recipe.attach(flour.clone()).expect("attach");
        let err = recipe.attach(flour).expect_err("duplicate");
        assert_eq!(err, RecipeError::DuplicateIngredient(ingredient_id(10)));
    }

    #[test]
    fn assign_identifiers_moves_pending_children() {
        let mut recipe = Recipe::new(RecipeId::new(1).expect("recipe id"));
        recipe
            .attach(Ingredient::new("Salt", amount("0.5"), teaspoon()))
            .expect("attach");
        recipe
            .attach(Ingredient::new("Sugar", amount("1.5"), teaspoon()))
            .expect("attach");

        let mut next = 0;
        let assigned = recipe
            .assign_identifiers(|| {
                next += 1;
                ingredient_id(next)
            })
            .expect("assignment");

        assert_eq!(assigned, vec![ingredient_id(1), ingredient_id(2)]);
        assert_eq!(recipe.ingredient_count(), 2);
        let salt = recipe.ingredient(ingredient_id(1)).expect("salt");
        assert_eq!(salt.description(), "Salt");
        assert_eq!(salt.id(), Some(ingredient_id(1)));
    }

    #[test]
    fn assign_identifiers_rejects_colliding_allocations() {
        let mut recipe = Recipe::new(RecipeId::new(1).expect("recipe id"));
        recipe
            .attach(Ingredient::new("Flour", amount("2"), teaspoon()).with_id(ingredient_id(7)))
            .expect("attach");
        recipe
            .attach(Ingredient::new("Salt", amount("0.5"), teaspoon()))
            .expect("attach");

        let err = recipe
            .assign_identifiers(|| ingredient_id(7))
            .expect_err("collision");
        assert_eq!(err, RecipeError::DuplicateIngredient(ingredient_id(7)));
    }

    #[test]
    fn detach_removes_the_ingredient() {
        let mut recipe = Recipe::new(RecipeId::new(1).expect("recipe id"));
        recipe
            .attach(Ingredient::new("Flour", amount("2"), teaspoon()).with_id(ingredient_id(10)))
            .expect("attach");

        let removed = recipe.detach(ingredient_id(10)).expect("removed");
        assert_eq!(removed.description(), "Flour");
        assert_eq!(recipe.ingredient_count(), 0);
        assert!(recipe.detach(ingredient_id(10)).is_none());
    }

    #[test]
    fn find_matching_prefers_the_lowest_identifier() {
        let mut recipe = Recipe::new(RecipeId::new(1).expect("recipe id"));
        recipe
            .attach(Ingredient::new("Salt", amount("0.5"), teaspoon()).with_id(ingredient_id(3)))
            .expect("attach");
        recipe
            .attach(Ingredient::new("Salt", amount("0.5"), teaspoon()).with_id(ingredient_id(8)))
            .expect("attach");

        let found = recipe
            .find_matching("Salt", &amount("0.5"), teaspoon().id())
            .expect("match");
        assert_eq!(found.id(), Some(ingredient_id(3)));
    }
}
