/// Progress aggregation for presentation
///
/// This module provides the read-side projections over the activity log,
/// streak state and unlocked achievements: daily and weekly activity,
/// monthly summaries, category breakdowns and completion percentages.
/// Nothing here mutates state.

use std::collections::{BTreeMap, BTreeSet};
use serde::Serialize;
use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{
    ActivityLog, AchievementEvaluator, Category, MilestoneProgress, ProgressStats,
};

/// Number of ISO weeks in the weekly series of a report
pub const REPORT_WEEKS: usize = 8;

/// Activity on a single calendar day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub events: usize,
    pub categories: Vec<Category>,
}

/// Activity within one ISO week (Monday to Sunday)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyTotal {
    pub week: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub events: usize,
    pub active_days: usize,
}

/// Activity within one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    /// Days of the month elapsed as of "today" (all of them for past months)
    pub days_counted: u32,
    pub active_days: u32,
    /// `active_days / days_counted`, 0.0 when no days have elapsed
    pub active_rate: f64,
    pub events: usize,
}

/// Everything a progress screen needs in one value
#[derive(Debug, Clone, Serialize)]
pub struct ProgressReport {
    pub stats: ProgressStats,
    pub daily: Vec<DailyActivity>,
    pub weekly: Vec<WeeklyTotal>,
    pub month: Option<MonthSummary>,
    pub categories: BTreeMap<Category, usize>,
    pub unlocked_count: usize,
    pub total_achievements: usize,
    pub completion_percentage: f64,
    pub total_points: u64,
    pub milestones: Vec<MilestoneProgress>,
}

/// Builds progress projections
#[derive(Debug, Default)]
pub struct ProgressAggregator;

impl ProgressAggregator {
    pub fn new() -> Self {
        Self
    }

    /// The last `days` calendar days ending today, oldest first
    pub fn daily_activity(&self, log: &ActivityLog, today: NaiveDate, days: usize) -> Vec<DailyActivity> {
        (0..days)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset as i64);
                let events = log.events_on_date(date);
                let categories: BTreeSet<Category> =
                    events.iter().map(|e| e.category.clone()).collect();

                DailyActivity {
                    date,
                    events: events.len(),
                    categories: categories.into_iter().collect(),
                }
            })
            .collect()
    }

    /// Totals for the last `weeks` ISO weeks including the current one, oldest first
    pub fn weekly_totals(&self, log: &ActivityLog, today: NaiveDate, weeks: usize) -> Vec<WeeklyTotal> {
        let current_week_start = week_start(today);

        (0..weeks)
            .rev()
            .map(|offset| {
                let start = current_week_start - Duration::weeks(offset as i64);
                let end = start + Duration::days(6);
                let events = log.events_between(start, end);
                let active_days: BTreeSet<NaiveDate> = events.iter().map(|e| e.date).collect();

                WeeklyTotal {
                    week: week_label(start),
                    start_date: start,
                    end_date: end,
                    events: events.len(),
                    active_days: active_days.len(),
                }
            })
            .collect()
    }

    /// Summary of one calendar month as seen from `today`
    ///
    /// Returns None for an invalid year/month.
    pub fn monthly_summary(
        &self,
        log: &ActivityLog,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> Option<MonthSummary> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        let last = next_first - Duration::days(1);

        let days_counted = if today < first {
            0
        } else if today >= last {
            last.day()
        } else {
            today.day()
        };

        let events = log.events_between(first, last);
        let active_days: BTreeSet<NaiveDate> = events.iter().map(|e| e.date).collect();
        let active_days = active_days.len() as u32;

        let active_rate = if days_counted == 0 {
            0.0
        } else {
            f64::from(active_days) / f64::from(days_counted)
        };

        Some(MonthSummary {
            year,
            month,
            days_counted,
            active_days,
            active_rate,
            events: events.len(),
        })
    }

    /// Number of retained events per category
    pub fn category_breakdown(&self, log: &ActivityLog) -> BTreeMap<Category, usize> {
        log.counts_by_category()
    }

    /// Percentage of achievements unlocked, 0.0..=100.0
    pub fn completion_percentage(&self, unlocked: usize, total_definitions: usize) -> f64 {
        if total_definitions == 0 {
            return 0.0;
        }
        (unlocked as f64 / total_definitions as f64 * 100.0).min(100.0)
    }

    /// Assemble the full progress report
    pub fn build_report(
        &self,
        log: &ActivityLog,
        stats: &ProgressStats,
        evaluator: &AchievementEvaluator,
        unlocked: &BTreeSet<String>,
        today: NaiveDate,
        days: usize,
    ) -> ProgressReport {
        let total_achievements = evaluator.definitions().len();
        let unlocked_count = evaluator
            .definitions()
            .iter()
            .filter(|d| unlocked.contains(&d.id))
            .count();

        ProgressReport {
            stats: *stats,
            daily: self.daily_activity(log, today, days),
            weekly: self.weekly_totals(log, today, REPORT_WEEKS),
            month: self.monthly_summary(log, today.year(), today.month(), today),
            categories: self.category_breakdown(log),
            unlocked_count,
            total_achievements,
            completion_percentage: self.completion_percentage(unlocked_count, total_achievements),
            total_points: evaluator.total_points(unlocked),
            milestones: evaluator.progress(stats, unlocked),
        }
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
