/// Streak calculation and tracking functionality
///
/// This module defines the StreakState struct that holds calculated streak
/// information, and derives it from the full set of active calendar dates.
/// Streaks are always recomputed from history rather than incremented, so
/// backfilled or out-of-order completions cannot make them drift.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Calculated streak information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    /// Consecutive active days ending today or yesterday
    pub current_streak: u32,
    /// Best streak ever achieved; never decreases
    pub best_streak: u32,
    /// Distinct calendar days with at least one completion; never decreases
    pub total_active_days: u32,
    /// Most recent active day not after "today" (None if never active)
    pub last_check_in_date: Option<NaiveDate>,
}

impl StreakState {
    /// Create an empty streak record
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute streak state from every active date
    ///
    /// `previous` is the last persisted state: best streak and active-day
    /// totals are merged with it so they stay monotonic even when the date
    /// set handed in is smaller than what was once observed.
    pub fn calculate(
        active_dates: &BTreeSet<NaiveDate>,
        today: NaiveDate,
        previous: &StreakState,
    ) -> Self {
        let current_streak = Self::current_run(active_dates, today);
        let longest = Self::longest_run(active_dates);
        let last_check_in_date = active_dates.range(..=today).next_back().copied();

        Self {
            current_streak,
            best_streak: previous.best_streak.max(longest).max(current_streak),
            total_active_days: previous.total_active_days.max(active_dates.len() as u32),
            last_check_in_date,
        }
    }

    /// Check if the streak is still alive: last check-in was today or yesterday
    pub fn is_on_track(&self, today: NaiveDate) -> bool {
        match self.last_check_in_date {
            None => false,
            Some(last) => {
                let days_since = (today - last).num_days();
                (0..=1).contains(&days_since)
            }
        }
    }

    /// Whether today already counts toward the streak
    pub fn checked_in_today(&self, today: NaiveDate) -> bool {
        self.last_check_in_date == Some(today)
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row. You're building a strong practice.", self.current_streak),
            7..=13 => format!("Excellent! {} days strong. You're in the groove now!", self.current_streak),
            14..=29 => format!("Amazing! {} days straight. This is becoming second nature.", self.current_streak),
            30..=99 => format!("Incredible! {} days of consistency. Your routine is rock solid!", self.current_streak),
            _ => format!("Legendary! {} days of unwavering commitment. You're an inspiration!", self.current_streak),
        }
    }

    // Private helpers

    /// Count consecutive active days backward from today
    ///
    /// If today has no completion yet the count starts at yesterday, so a
    /// streak is not lost until a full day is missed.
    fn current_run(dates: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
        let mut checking = if dates.contains(&today) {
            Some(today)
        } else {
            today.pred_opt()
        };

        let mut run = 0;
        while let Some(date) = checking {
            if !dates.contains(&date) {
                break;
            }
            run += 1;
            checking = date.pred_opt();
        }
        run
    }

    /// Longest run of consecutive dates anywhere in the set
    fn longest_run(dates: &BTreeSet<NaiveDate>) -> u32 {
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;

        for &date in dates {
            run = match previous.and_then(|p| p.succ_opt()) {
                Some(expected) if expected == date => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(date);
        }

        longest
    }
}
