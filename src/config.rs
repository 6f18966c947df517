//! Engine settings loading.
//!
//! Algorithm parameters live in [`ConfigurationOptions`](crate::core::types::ConfigurationOptions)
//! and travel with the project. These settings only shape presentation and
//! bookkeeping, so every field has a default.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Reserved color of exact matches.
    pub match_color: String,
    /// Colors cycled through for cosine correspondences, by pair position.
    pub palette: Vec<String>,
    /// Emphasis color for a hovered, unheld pair. Palette color when unset.
    pub hover_color: Option<String>,
    pub underline_color: String,
    /// Maximum undo depth. Unbounded when unset.
    pub history_limit: Option<usize>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            match_color: "green".to_string(),
            palette: vec!["orange".to_string()],
            hover_color: None,
            underline_color: "black".to_string(),
            history_limit: None,
        }
    }
}

impl EngineSettings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let settings: EngineSettings = toml::from_str(contents)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "palette",
                reason: "must contain at least one color".to_string(),
            });
        }
        if self.palette.iter().any(|color| color.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "palette",
                reason: "colors must not be empty".to_string(),
            });
        }
        if self.match_color.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "match_color",
                reason: "must not be empty".to_string(),
            });
        }
        if self.underline_color.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "underline_color",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
