//! Game setup passed explicitly into [`crate::Game::from_config`].

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::variant::Variant;

/// Variant, optional starting FEN and PGN tags for a new game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: Variant,
    /// Starting position; the variant's standard start when absent.
    pub fen: Option<String>,
    /// Fischer-random start number, used when `fen` is absent.
    pub chess960_index: Option<u16>,
    pub tags: BTreeMap<String, String>,
}

impl GameConfig {
    pub fn new(variant: Variant) -> Self {
        GameConfig {
            variant,
            ..Default::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a `.toml` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            Some("json") => Self::from_json_str(&contents),
            other => Err(ConfigError::Extension(other.unwrap_or("").to_string())),
        }
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
