// crates/cities-light-core/src/config.rs

//! Runtime settings for derivation, validation and indexing.

use crate::error::{GeoError, Result};
use serde::{Deserialize, Serialize};
#[cfg(feature = "json")]
use std::path::Path;

/// Tunables shared by the write path and the importer.
///
/// Every field has a default, so a settings file only needs to list what it
/// overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run the autocomplete prefix indexer after each city commit.
    pub index_prefixes: bool,
    /// Shortest prefix written to the dictionary.
    pub min_prefix_len: usize,
    /// Upper bound on `name` length, in characters.
    pub max_name_len: usize,
    /// Slugs are cut to this many bytes.
    pub max_slug_len: usize,
    /// Default number of autocomplete results.
    pub autocomplete_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            index_prefixes: true,
            min_prefix_len: 3,
            max_name_len: 200,
            max_slug_len: 50,
            autocomplete_limit: 10,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file.
    #[cfg(feature = "json")]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse settings from a JSON string and validate them.
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_prefix_len == 0 {
            return Err(GeoError::InvalidData(
                "min_prefix_len must be at least 1".into(),
            ));
        }
        if self.max_name_len == 0 || self.max_slug_len == 0 {
            return Err(GeoError::InvalidData(
                "max_name_len and max_slug_len must be positive".into(),
            ));
        }
        Ok(())
    }
}
