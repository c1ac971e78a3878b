/// Achievement evaluator tests
use std::collections::BTreeSet;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use wellness_tracker::*;

fn stats(best_streak: u32, total_events: u64, active_days: u32, variety: u32) -> ProgressStats {
    ProgressStats {
        current_streak: best_streak,
        best_streak,
        total_events,
        active_days,
        category_variety: variety,
    }
}

fn ids(unlocked: &[UnlockedAchievement]) -> BTreeSet<String> {
    unlocked.iter().map(|u| u.achievement_id.clone()).collect()
}

#[test]
fn test_week_warrior_unlocks_once() {
    let evaluator = AchievementEvaluator::new(vec![AchievementDefinition::new(
        "week-warrior",
        "Week Warrior",
        "Reach a 7 day streak",
        "streak",
        Metric::Streak,
        7,
        50,
        Rarity::Uncommon,
    )])
    .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap();

    let first = evaluator.evaluate(&stats(7, 7, 7, 1), &BTreeSet::new(), now);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].achievement_id, "week-warrior");
    assert_eq!(first[0].unlocked_at, now);

    let again = evaluator.evaluate(&stats(7, 7, 7, 1), &ids(&first), now);
    assert!(again.is_empty());
}

#[test]
fn test_point_thresholds_cascade_in_one_call() {
    let evaluator = AchievementEvaluator::new(default_catalog()).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap();

    // 10+25+50+100 milestone points alone cross the 100 point line
    let unlocked = evaluator.evaluate(&stats(1, 100, 1, 1), &BTreeSet::new(), now);
    let got = ids(&unlocked);
    assert!(got.contains("centurion"));
    assert!(got.contains("point-collector"));
    assert!(!got.contains("point-hoarder"));

    let positions: Vec<usize> = unlocked
        .iter()
        .map(|u| {
            evaluator
                .definitions()
                .iter()
                .position(|d| d.id == u.achievement_id)
                .unwrap()
        })
        .collect();
    let mut sorted = positions.clone();
    sorted.sort();
    assert_eq!(positions, sorted);
}

#[test]
fn test_unknown_ids_are_worth_nothing() {
    let evaluator = AchievementEvaluator::new(default_catalog()).unwrap();
    let mut unlocked = BTreeSet::new();
    unlocked.insert("first-step".to_string());
    unlocked.insert("retired-badge".to_string());
    assert_eq!(evaluator.total_points(&unlocked), 10);
}

#[test]
fn test_invalid_tables_are_rejected() {
    let def = |id: &str, value: u64| {
        AchievementDefinition::new(id, "X", "", "misc", Metric::TotalEvents, value, 1, Rarity::Common)
    };

    assert!(AchievementEvaluator::new(vec![def("a", 1), def("a", 2)]).is_err());
    assert!(AchievementEvaluator::new(vec![def(" ", 1)]).is_err());
    assert!(AchievementEvaluator::new(vec![def("zero", 0)]).is_err());
    assert!(AchievementEvaluator::new(Vec::new()).is_ok());
}

#[test]
fn test_progress_reports_fraction_toward_locked() {
    let evaluator = AchievementEvaluator::new(default_catalog()).unwrap();
    let progress = evaluator.progress(&stats(3, 5, 3, 2), &BTreeSet::new());

    let week = progress.iter().find(|p| p.achievement_id == "week-warrior").unwrap();
    assert_eq!(week.current, 3);
    assert_eq!(week.target, 7);
    assert!((week.fraction - 3.0 / 7.0).abs() < 1e-9);
    assert!(!week.unlocked);
}

proptest! {
    #[test]
    fn prop_evaluate_is_idempotent(
        best in 0u32..120,
        events in 0u64..200,
        days in 0u32..120,
        variety in 0u32..8,
    ) {
        let evaluator = AchievementEvaluator::new(default_catalog()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 7, 9, 0, 0).unwrap();
        let stats = stats(best, events, days, variety);

        let first = evaluator.evaluate(&stats, &BTreeSet::new(), now);
        let already = ids(&first);
        prop_assert_eq!(already.len(), first.len());

        let second = evaluator.evaluate(&stats, &already, now);
        prop_assert!(second.is_empty());
    }
}
