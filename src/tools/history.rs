/// Tools for browsing logged events and configured categories
///
/// This module implements the wellness_history and wellness_categories MCP tools.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{CategoryInfo, CompletionEvent, DomainError};
use crate::storage::KeyValueBackend;
use crate::tracker::WellnessTracker;

/// Parameters for listing a day's events
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub date: Option<String>, // YYYY-MM-DD, defaults to today
}

/// One logged event
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub event_id: String,
    pub category: String,
    pub category_name: String,
    pub logged_at: String,
}

/// Response from listing a day's events
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub date: String,
    pub events: Vec<HistoryEntry>,
    pub message: String,
}

/// Response from listing categories
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryInfo>,
    pub message: String,
}

/// List the events logged on a date
pub fn get_history<B: KeyValueBackend>(
    tracker: &WellnessTracker<B>,
    params: HistoryParams,
    today: NaiveDate,
) -> Result<HistoryResponse, DomainError> {
    let date = match params.date.as_deref() {
        Some(raw) => CompletionEvent::parse_date(raw)?,
        None => today,
    };

    let events: Vec<HistoryEntry> = tracker
        .events_on_date(date)
        .into_iter()
        .map(|e| HistoryEntry {
            event_id: e.id.to_string(),
            category: e.category.to_string(),
            category_name: tracker
                .config()
                .category(&e.category)
                .map(|info| info.name.clone())
                .unwrap_or_else(|| e.category.to_string()),
            logged_at: e.logged_at.to_rfc3339(),
        })
        .collect();

    let message = if events.is_empty() {
        format!("📅 No activities logged on {}", date)
    } else {
        format!(
            "📅 {} activit{} on {}:\n{}",
            events.len(),
            if events.len() == 1 { "y" } else { "ies" },
            date,
            events
                .iter()
                .map(|e| format!("   • {}", e.category_name))
                .collect::<Vec<_>>()
                .join("\n")
        )
    };

    Ok(HistoryResponse {
        date: date.to_string(),
        events,
        message,
    })
}

/// List the configured categories
pub fn list_categories<B: KeyValueBackend>(tracker: &WellnessTracker<B>) -> CategoriesResponse {
    let categories = tracker.config().categories.clone();
    let message = format!(
        "🗂️ Categories: {}",
        categories
            .iter()
            .map(|c| format!("{} ({})", c.name, c.id))
            .collect::<Vec<_>>()
            .join(", ")
    );

    CategoriesResponse { categories, message }
}
