/// Tool for progress reports
///
/// This module implements the wellness_progress MCP tool.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::analytics::ProgressReport;
use crate::storage::KeyValueBackend;
use crate::tracker::WellnessTracker;

/// Default and maximum length of the daily window
const DEFAULT_DAYS: u32 = 7;
const MAX_DAYS: u32 = 90;

/// Parameters for a progress report
#[derive(Debug, Default, Deserialize)]
pub struct ProgressParams {
    pub days: Option<u32>,
}

/// Response carrying the full report plus a readable summary
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub report: ProgressReport,
    pub message: String,
}

/// Build a progress report for the last `days` days
pub fn get_progress<B: KeyValueBackend>(
    tracker: &WellnessTracker<B>,
    params: ProgressParams,
    today: NaiveDate,
) -> ProgressResponse {
    let days = params.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS);
    let report = tracker.progress_report(today, days as usize);

    let daily_line = report
        .daily
        .iter()
        .map(|d| if d.events > 0 { "●" } else { "○" })
        .collect::<String>();

    let categories = if report.categories.is_empty() {
        "none yet".to_string()
    } else {
        report
            .categories
            .iter()
            .map(|(category, count)| format!("{} {}", category, count))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let month_line = match &report.month {
        Some(m) => format!(
            "\n   This month: {} of {} days active ({:.0}%)",
            m.active_days, m.days_counted, m.active_rate * 100.0
        ),
        None => String::new(),
    };

    let message = format!(
        "📈 Last {} days: {}{}\n   Categories: {}\n   Achievements: {}/{} ({:.1}%) | {} points",
        days,
        daily_line,
        month_line,
        categories,
        report.unlocked_count,
        report.total_achievements,
        report.completion_percentage,
        report.total_points
    );

    ProgressResponse { report, message }
}
