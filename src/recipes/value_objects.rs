use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU64;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Value object ensuring a recipe identifier is a positive integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(NonZeroU64);

impl RecipeId {
    const ENTITY: &'static str = "recipe";

    /// Validates and constructs a new [`RecipeId`].
    ///
    /// Zero is rejected because stores use it as the unassigned placeholder.
    pub fn new(value: u64) -> Result<Self, IdError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or_else(|| IdError::invalid(Self::ENTITY, value))
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for RecipeId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for RecipeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<u64>()
            .map_err(|_| IdError::invalid(Self::ENTITY, s))?;
        Self::new(value)
    }
}

/// Value object ensuring an ingredient identifier is a positive integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientId(NonZeroU64);

impl IngredientId {
    const ENTITY: &'static str = "ingredient";

    /// Validates and constructs a new [`IngredientId`].
    pub fn new(value: u64) -> Result<Self, IdError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or_else(|| IdError::invalid(Self::ENTITY, value))
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for IngredientId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl Display for IngredientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for IngredientId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<u64>()
            .map_err(|_| IdError::invalid(Self::ENTITY, s))?;
        Self::new(value)
    }
}

/// Value object ensuring a unit-of-measure identifier is a positive integer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(NonZeroU64);

impl UnitId {
    const ENTITY: &'static str = "unit of measure";

    /// Validates and constructs a new [`UnitId`].
    pub fn new(value: u64) -> Result<Self, IdError> {
        NonZeroU64::new(value)
            .map(Self)
            .ok_or_else(|| IdError::invalid(Self::ENTITY, value))
    }

    /// Returns the raw numeric value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl From<NonZeroU64> for UnitId {
    fn from(value: NonZeroU64) -> Self {
        Self(value)
    }
}

impl Display for UnitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for UnitId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<u64>()
            .map_err(|_| IdError::invalid(Self::ENTITY, s))?;
        Self::new(value)
    }
}

/// Errors produced when validating an entity identifier.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// The supplied value is not a positive integer.
    #[error("invalid {entity} identifier: {value}")]
    Invalid { entity: &'static str, value: String },
}

impl IdError {
    fn invalid(entity: &'static str, value: impl ToString) -> Self {
        Self::Invalid {
            entity,
            value: value.to_string(),
        }
    }
}

/// Value object wrapping a non-negative ingredient quantity.
///
/// Equality is exact decimal equality, which keeps field-based ingredient
/// matching well defined after a save.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "BigDecimal", into = "BigDecimal")]
pub struct Amount(BigDecimal);

impl Amount {
    /// Validates and constructs a new [`Amount`], rejecting negative values.
    pub fn new(value: BigDecimal) -> Result<Self, AmountError> {
        if value < BigDecimal::from(0) {
            return Err(AmountError::Negative { value });
        }
        Ok(Self(value))
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub fn value(&self) -> &BigDecimal {
        &self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .parse::<BigDecimal>()
            .map_err(|_| AmountError::Invalid {
                value: s.to_owned(),
            })?;
        Self::new(value)
    }
}

impl TryFrom<BigDecimal> for Amount {
    type Error = AmountError;

    fn try_from(value: BigDecimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for BigDecimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Errors produced when validating an [`Amount`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// The supplied text could not be parsed as a decimal quantity.
    #[error("invalid amount: {value}")]
    Invalid { value: String },
    /// Quantities below zero are never meaningful for an ingredient.
    #[error("amount must not be negative: {value}")]
    Negative { value: BigDecimal },
}

#[cfg(test)]
mod tests {
    use super::{Amount, IngredientId, RecipeId, UnitId};

    #[test]
    fn accepts_positive_identifiers() {
        let id = RecipeId::new(1).expect("valid id");
        assert_eq!(id.get(), 1);
        assert_eq!(id.to_string(), "1");
    }

    #[test]
    fn rejects_zero_identifiers() {
        let err = IngredientId::new(0).expect_err("zero id");
        assert!(matches!(err, super::IdError::Invalid { value, .. } if value == "0"));
    }

    #[test]
    fn parses_identifiers_from_text() {
        let id: UnitId = "5".parse().expect("valid id");
        assert_eq!(id.get(), 5);
        assert!("five".parse::<UnitId>().is_err());
    }

    #[test]
    fn accepts_non_negative_amounts() {
        let amount: Amount = "1.5".parse().expect("valid amount");
        assert_eq!(amount.to_string(), "1.5");
        let zero: Amount = "0".parse().expect("zero amount");
        assert_eq!(zero.to_string(), "0");
    }

    #[test]
    fn rejects_negative_amounts() {
        let err = "-0.5".parse::<Amount>().expect_err("negative amount");
        assert!(matches!(err, super::AmountError::Negative { .. }));
    }

    #[test]
    fn amount_equality_ignores_trailing_scale() {
        let short: Amount = "2".parse().expect("amount");
        let long: Amount = "2.0".parse().expect("amount");
        assert_eq!(short, long);
    }
}
