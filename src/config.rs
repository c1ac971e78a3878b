/// Tracker configuration
///
/// The category table and achievement definitions are static configuration
/// handed to the tracker at startup. They come from a JSON file when one is
/// given, otherwise from the built-in defaults. Missing fields in the file
/// fall back to the defaults individually.

use std::collections::HashSet;
use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    default_catalog, default_categories, AchievementDefinition, Category, CategoryInfo,
    DomainError, DEFAULT_RETENTION_CAP,
};

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Read-only configuration table for the tracker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Maximum number of events kept in the activity log
    pub retention_cap: usize,
    /// Categories users may log activities under
    pub categories: Vec<CategoryInfo>,
    /// Achievement rule table
    pub achievements: Vec<AchievementDefinition>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            retention_cap: DEFAULT_RETENTION_CAP,
            categories: default_categories(),
            achievements: default_catalog(),
        }
    }
}

impl TrackerConfig {
    /// Load and validate a JSON configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::info!(
            "Loaded config from {}: {} categories, {} achievements",
            path.display(),
            config.categories.len(),
            config.achievements.len()
        );
        Ok(config)
    }

    /// Check the table for structural problems
    ///
    /// Achievement definitions are validated again when the evaluator is
    /// built; this covers the settings the evaluator does not see.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention_cap == 0 {
            return Err(ConfigError::Invalid(
                "retention_cap must be at least 1".to_string()
            ));
        }

        if self.categories.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one category must be configured".to_string()
            ));
        }

        let mut seen = HashSet::new();
        for info in &self.categories {
            if !seen.insert(&info.id) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate category '{}'", info.id
                )));
            }
        }

        Ok(())
    }

    /// Resolve a raw category string against the configured table
    pub fn resolve_category(&self, raw: &str) -> Result<Category, DomainError> {
        let category = Category::parse(raw)?;
        if self.category(&category).is_none() {
            return Err(DomainError::UnknownCategory(category.to_string()));
        }
        Ok(category)
    }

    pub fn category(&self, id: &Category) -> Option<&CategoryInfo> {
        self.categories.iter().find(|info| &info.id == id)
    }
}
