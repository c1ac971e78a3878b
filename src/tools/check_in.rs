/// Tool for logging activity completions
///
/// This module implements the wellness_check_in MCP tool.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{CompletionEvent, DomainError};
use crate::storage::KeyValueBackend;
use crate::tracker::WellnessTracker;

/// Parameters for logging a completion
#[derive(Debug, Deserialize)]
pub struct CheckInParams {
    pub category: String,
    pub date: Option<String>, // Optional YYYY-MM-DD, defaults to today
}

/// Newly unlocked achievement as reported to the client
#[derive(Debug, Serialize)]
pub struct UnlockNotice {
    pub achievement_id: String,
    pub name: String,
    pub points: u32,
}

/// Response from logging a completion
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    pub success: bool,
    pub message: String,
    pub event_id: String,
    pub current_streak: u32,
    pub best_streak: u32,
    pub new_achievements: Vec<UnlockNotice>,
}

/// Log a completion and report the resulting streak and unlocks
pub fn check_in<B: KeyValueBackend>(
    tracker: &mut WellnessTracker<B>,
    params: CheckInParams,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<CheckInResponse, DomainError> {
    let date = params
        .date
        .as_deref()
        .map(CompletionEvent::parse_date)
        .transpose()?;

    let outcome = tracker.check_in(&params.category, date, today, now)?;

    let new_achievements: Vec<UnlockNotice> = outcome
        .newly_unlocked
        .iter()
        .filter_map(|u| tracker.evaluator().definition(&u.achievement_id))
        .map(|def| UnlockNotice {
            achievement_id: def.id.clone(),
            name: def.name.clone(),
            points: def.points,
        })
        .collect();

    let streak = &outcome.streak;
    let mut message = if outcome.new_active_day {
        format!(
            "🔥 Logged {}! Current streak: {} day{}",
            outcome.event.category,
            streak.current_streak,
            if streak.current_streak == 1 { "" } else { "s" }
        )
    } else {
        format!(
            "✅ Logged {}. {} already counted toward your streak ({} day{})",
            outcome.event.category,
            outcome.event.date,
            streak.current_streak,
            if streak.current_streak == 1 { "" } else { "s" }
        )
    };

    for notice in &new_achievements {
        message.push_str(&format!("\n🏆 Achievement unlocked: {} (+{} pts)", notice.name, notice.points));
    }

    Ok(CheckInResponse {
        success: true,
        message,
        event_id: outcome.event.id.to_string(),
        current_streak: streak.current_streak,
        best_streak: streak.best_streak,
        new_achievements,
    })
}
