//! Configuration types for the store adapters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage backend selection for the recipe and unit stores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Keep all aggregates in process memory.
    #[default]
    InMemory,
}

/// A unit-of-measure record seeded into the unit store at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSeed {
    /// Raw unit identifier, validated when the store is built.
    pub id: u64,
    /// Human readable unit description.
    pub description: String,
}

/// Settings controlling how the service builds its stores.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Backend powering both stores.
    pub backend: StoreBackend,
    /// Unit-of-measure reference data loaded at startup.
    pub units: Vec<UnitSeed>,
}

impl StoreSettings {
    /// Parses settings from a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Errors produced when loading store settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The settings document was not valid YAML for this schema.
    #[error("failed to parse store settings: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::{StoreBackend, StoreSettings};

    #[test]
    fn parses_settings_from_yaml() {
        let settings = StoreSettings::from_yaml(
            r"
backend: in_memory
units:
  - id: 5
    description: Teaspoon
",
        )
        .expect("valid settings");
        assert_eq!(settings.backend, StoreBackend::InMemory);
        assert_eq!(settings.units.len(), 1);
        assert_eq!(settings.units[0].description, "Teaspoon");
    }

    #[test]
    fn empty_document_falls_back_to_defaults() {
        let settings = StoreSettings::from_yaml("{}").expect("defaults");
        assert_eq!(settings, StoreSettings::default());
    }

    #[test]
    fn rejects_unknown_backends() {
        assert!(StoreSettings::from_yaml("backend: carrier_pigeon").is_err());
    }
}
