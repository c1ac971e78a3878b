/// Streak calculator tests over raw date sets
use std::collections::BTreeSet;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use wellness_tracker::*;

fn day(n: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap() + Duration::days(n)
}

fn dates(days: &[i64]) -> BTreeSet<NaiveDate> {
    days.iter().map(|&n| day(n)).collect()
}

#[test]
fn test_single_day_starts_streak() {
    let state = StreakState::calculate(&dates(&[0]), day(0), &StreakState::new());
    assert_eq!(state.current_streak, 1);
    assert_eq!(state.best_streak, 1);
    assert_eq!(state.total_active_days, 1);
    assert_eq!(state.last_check_in_date, Some(day(0)));
}

#[test]
fn test_gap_resets_current_but_not_best() {
    let mut state = StreakState::new();
    let mut active = BTreeSet::new();
    for n in [0, 1, 3] {
        active.insert(day(n));
        state = StreakState::calculate(&active, day(n), &state);
    }
    assert_eq!(state.current_streak, 1);
    assert_eq!(state.best_streak, 2);
}

#[test]
fn test_streak_survives_until_a_full_day_is_missed() {
    let active = dates(&[0, 1, 2]);

    let next_day = StreakState::calculate(&active, day(3), &StreakState::new());
    assert_eq!(next_day.current_streak, 3);
    assert!(next_day.is_on_track(day(3)));
    assert!(!next_day.checked_in_today(day(3)));

    let missed = StreakState::calculate(&active, day(4), &next_day);
    assert_eq!(missed.current_streak, 0);
    assert_eq!(missed.best_streak, 3);
    assert!(!missed.is_on_track(day(4)));
}

#[test]
fn test_backfill_bridges_gap() {
    let before = StreakState::calculate(&dates(&[0, 1, 3, 4]), day(4), &StreakState::new());
    assert_eq!(before.current_streak, 2);

    let after = StreakState::calculate(&dates(&[0, 1, 2, 3, 4]), day(4), &before);
    assert_eq!(after.current_streak, 5);
    assert_eq!(after.best_streak, 5);
}

#[test]
fn test_previous_best_is_kept_for_smaller_history() {
    let previous = StreakState {
        current_streak: 0,
        best_streak: 40,
        total_active_days: 60,
        last_check_in_date: Some(day(-10)),
    };
    let state = StreakState::calculate(&dates(&[0]), day(0), &previous);
    assert_eq!(state.best_streak, 40);
    assert_eq!(state.total_active_days, 60);
    assert_eq!(state.current_streak, 1);
}

#[test]
fn test_dates_after_today_are_ignored_for_last_check_in() {
    let state = StreakState::calculate(&dates(&[0, 5]), day(1), &StreakState::new());
    assert_eq!(state.last_check_in_date, Some(day(0)));
    assert_eq!(state.current_streak, 1);
}

proptest! {
    #[test]
    fn prop_best_streak_never_decreases(offsets in proptest::collection::vec(0i64..60, 1..40)) {
        let mut state = StreakState::new();
        let mut active = BTreeSet::new();
        let today = day(60);

        for n in offsets {
            active.insert(day(n));
            let next = StreakState::calculate(&active, today, &state);
            prop_assert!(next.best_streak >= state.best_streak);
            prop_assert!(next.total_active_days >= state.total_active_days);
            prop_assert!(next.current_streak <= next.best_streak);
            state = next;
        }
        prop_assert_eq!(state.total_active_days as usize, active.len());
    }

    #[test]
    fn prop_insertion_order_does_not_matter(offsets in proptest::collection::vec(0i64..30, 1..20)) {
        let forward: BTreeSet<NaiveDate> = offsets.iter().map(|&n| day(n)).collect();
        let today = day(30);

        let mut incremental = StreakState::new();
        let mut seen = BTreeSet::new();
        for &n in offsets.iter().rev() {
            seen.insert(day(n));
            incremental = StreakState::calculate(&seen, today, &incremental);
        }

        let direct = StreakState::calculate(&forward, today, &StreakState::new());
        prop_assert_eq!(incremental, direct);
    }
}
