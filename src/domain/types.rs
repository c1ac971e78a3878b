/// Core types used throughout the domain layer
///
/// This module defines identifiers and the Category type that tag completion
/// events. The set of valid categories is configuration, so Category is a
/// validated slug rather than a closed enum.

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::domain::DomainError;

/// Maximum length of a category slug
const MAX_CATEGORY_LEN: usize = 32;

/// Unique identifier for a completion event
///
/// The value is the creation time in Unix milliseconds. When two events are
/// created within the same millisecond the later one is bumped forward, so
/// ids are strictly increasing in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl EventId {
    /// Pick the id for a new event given the creation timestamp and the
    /// last id handed out in the same log
    pub fn next(timestamp_millis: i64, last: Option<EventId>) -> Self {
        match last {
            Some(EventId(prev)) if timestamp_millis <= prev => Self(prev + 1),
            _ => Self(timestamp_millis),
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Activity category a completion event belongs to (e.g. "mindfulness")
///
/// Categories are lowercase slugs made of ASCII letters, digits, '-' and '_'.
/// Whether a category is *known* is decided by the tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Parse and normalise a category slug
    ///
    /// Surrounding whitespace is trimmed and the value is lowercased before
    /// validation.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let slug = raw.trim().to_lowercase();

        if slug.is_empty() {
            return Err(DomainError::InvalidCategory(
                "Category cannot be empty".to_string()
            ));
        }

        if slug.len() > MAX_CATEGORY_LEN {
            return Err(DomainError::InvalidCategory(format!(
                "Category cannot be longer than {} characters", MAX_CATEGORY_LEN
            )));
        }

        if !slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(DomainError::InvalidCategory(format!(
                "Category '{}' may only contain letters, digits, '-' and '_'", slug
            )));
        }

        Ok(Self(slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.0
    }
}

/// Presentation metadata for a configured category
///
/// The core only uses `id`; name, color and icon are carried through for
/// whatever front end renders them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub id: Category,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl CategoryInfo {
    pub fn new(id: &str, name: &str, color: &str, icon: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id: Category::parse(id)?,
            name: name.to_string(),
            color: Some(color.to_string()),
            icon: Some(icon.to_string()),
        })
    }
}

/// Built-in category table used when no configuration file is supplied
pub fn default_categories() -> Vec<CategoryInfo> {
    [
        ("mindfulness", "Mindfulness", "#7c9cbf", "lotus"),
        ("breathing", "Breathing", "#8fc1b5", "wind"),
        ("exercise", "Exercise", "#e4a05f", "running"),
        ("gratitude", "Gratitude", "#e6c35c", "heart"),
        ("journaling", "Journaling", "#a98bc7", "notebook"),
        ("mood", "Mood", "#d98c9a", "smile"),
        ("social", "Social", "#6fb07f", "people"),
    ]
    .iter()
    .filter_map(|(id, name, color, icon)| CategoryInfo::new(id, name, color, icon).ok())
    .collect()
}
