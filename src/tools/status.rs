/// Tool for checking streak status
///
/// This module implements the wellness_status MCP tool.

use serde::Serialize;
use chrono::NaiveDate;
use crate::storage::KeyValueBackend;
use crate::tracker::WellnessTracker;

/// Response from checking status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub current_streak: u32,
    pub best_streak: u32,
    pub total_active_days: u32,
    pub last_check_in_date: Option<String>,
    pub on_track: bool,
    pub checked_in_today: bool,
    pub total_events: u64,
    pub total_points: u64,
    pub message: String,
}

/// Summarise the current streak state
pub fn get_status<B: KeyValueBackend>(
    tracker: &WellnessTracker<B>,
    today: NaiveDate,
) -> StatusResponse {
    let streak = tracker.streak();
    let stats = tracker.stats();
    let total_points = tracker.total_points();
    let checked_in_today = streak.checked_in_today(today);

    let reminder = if checked_in_today {
        "Today is already counted."
    } else if streak.is_on_track(today) {
        "Check in today to keep your streak going."
    } else {
        "Check in today to start a new streak."
    };

    let message = format!(
        "📊 {}\n   Current streak: {} days | Best: {} days | Active days: {}{}\n   Completions: {} | Points: {}\n   {}",
        streak.motivational_message(),
        streak.current_streak,
        streak.best_streak,
        streak.total_active_days,
        if let Some(last) = streak.last_check_in_date {
            format!(" | Last check-in: {}", last)
        } else {
            "".to_string()
        },
        stats.total_events,
        total_points,
        reminder
    );

    StatusResponse {
        current_streak: streak.current_streak,
        best_streak: streak.best_streak,
        total_active_days: streak.total_active_days,
        last_check_in_date: streak.last_check_in_date.map(|d| d.to_string()),
        on_track: streak.is_on_track(today),
        checked_in_today,
        total_events: stats.total_events,
        total_points,
        message,
    }
}
