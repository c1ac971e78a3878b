/// Persistence across sessions and degraded storage
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;
use wellness_tracker::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("wellness.db");
    let now = Utc.with_ymd_and_hms(2026, 6, 10, 7, 0, 0).unwrap();

    {
        let mut server = TrackerServer::new(db_path.clone(), TrackerConfig::default())
            .expect("Failed to create first server");
        let tracker = server.tracker_mut();
        tracker.check_in("mindfulness", Some(today() - Duration::days(1)), today(), now).unwrap();
        tracker.check_in("exercise", None, today(), now).unwrap();
    }

    let server = TrackerServer::new(db_path, TrackerConfig::default())
        .expect("Failed to create second server");
    let tracker = server.tracker();

    assert_eq!(tracker.log().len(), 2);
    assert_eq!(tracker.streak().current_streak, 2);
    assert_eq!(tracker.streak().best_streak, 2);
    assert_eq!(tracker.totals().category_variety(), 2);
    assert!(tracker.unlocked_ids().contains("first-step"));
    assert_eq!(tracker.unlocked().len(), 1);
}

#[test]
fn test_all_collections_are_written() {
    let mut tracker = WellnessTracker::open(
        PersistedStore::new(SqliteBackend::open_in_memory().unwrap()),
        TrackerConfig::default(),
    )
    .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 6, 10, 7, 0, 0).unwrap();
    tracker.check_in("mood", None, today(), now).unwrap();

    let mut stored = tracker.store().backend().keys().unwrap();
    stored.sort();
    let mut expected: Vec<String> = keys::ALL.iter().map(|k| k.to_string()).collect();
    expected.sort();
    assert_eq!(stored, expected);
}

#[test]
fn test_quota_exhaustion_keeps_session_state() {
    let mut tracker = WellnessTracker::open(
        PersistedStore::new(MemoryBackend::with_quota(64)),
        TrackerConfig::default(),
    )
    .unwrap();
    let now = Utc.with_ymd_and_hms(2026, 6, 10, 7, 0, 0).unwrap();

    let outcome = tracker.check_in("breathing", None, today(), now).unwrap();
    assert_eq!(outcome.streak.current_streak, 1);
    tracker.check_in("breathing", None, today(), now).unwrap();

    assert_eq!(tracker.log().len(), 2);
    assert_eq!(tracker.totals().total_events, 2);
    assert!(tracker.store().backend().read(keys::ACTIVITY_LOG).unwrap().is_none());
}

#[test]
fn test_legacy_documents_without_totals_are_reconciled() {
    let backend = MemoryBackend::new();
    backend
        .write(
            keys::ACTIVITY_LOG,
            r#"[{"id":1,"category":"mood","date":"2026-06-08","logged_at":"2026-06-08T08:00:00Z"},
                {"id":2,"category":"social","date":"2026-06-09","logged_at":"2026-06-09T08:00:00Z"}]"#,
        )
        .unwrap();
    backend
        .write(
            keys::UNLOCKED_ACHIEVEMENTS,
            r#"[{"achievement_id":"first-step","unlocked_at":"2026-06-08T08:00:00Z"},
                {"achievement_id":"first-step","unlocked_at":"2026-06-09T08:00:00Z"}]"#,
        )
        .unwrap();

    let mut tracker = WellnessTracker::open(PersistedStore::new(backend), TrackerConfig::default()).unwrap();
    assert_eq!(tracker.totals().total_events, 2);
    assert_eq!(tracker.totals().active_days(), 2);
    assert_eq!(tracker.unlocked().len(), 1);
    assert_eq!(
        tracker.unlocked()[0].unlocked_at,
        Utc.with_ymd_and_hms(2026, 6, 8, 8, 0, 0).unwrap()
    );

    let now = Utc.with_ymd_and_hms(2026, 6, 10, 7, 0, 0).unwrap();
    let newly = tracker.refresh(today(), now);
    assert!(newly.is_empty());
    assert_eq!(tracker.streak().current_streak, 2);
}

#[test]
fn test_corrupt_collection_starts_empty() {
    let backend = MemoryBackend::new();
    backend.write(keys::ACTIVITY_LOG, "not json at all").unwrap();

    let tracker = WellnessTracker::open(PersistedStore::new(backend), TrackerConfig::default()).unwrap();
    assert!(tracker.log().is_empty());
    assert_eq!(tracker.streak().current_streak, 0);
}

#[test]
fn test_invalid_config_is_rejected_at_open() {
    let config = TrackerConfig {
        retention_cap: 0,
        ..TrackerConfig::default()
    };
    let result = WellnessTracker::open(PersistedStore::new(MemoryBackend::new()), config);
    assert!(matches!(result, Err(TrackerError::Config(_))));
}

#[test]
fn test_refresh_after_open_lapses_stale_streak() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("wellness.db");
    let last_day = NaiveDate::from_ymd_opt(2026, 6, 5).unwrap();

    {
        let mut tracker = WellnessTracker::open(
            PersistedStore::new(SqliteBackend::new(db_path.clone()).unwrap()),
            TrackerConfig::default(),
        )
        .unwrap();
        for n in (0..5).rev() {
            let date = last_day - Duration::days(n);
            let now = Utc.from_utc_datetime(&date.and_hms_opt(8, 0, 0).unwrap());
            tracker.check_in("mindfulness", None, date, now).unwrap();
        }
    }

    let mut tracker = WellnessTracker::open(
        PersistedStore::new(SqliteBackend::new(db_path).unwrap()),
        TrackerConfig::default(),
    )
    .unwrap();
    assert_eq!(tracker.streak().current_streak, 5);
    assert_eq!(tracker.streak().last_check_in_date, Some(last_day));

    let later = NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();
    tracker.refresh(later, Utc.with_ymd_and_hms(2026, 6, 21, 8, 0, 0).unwrap());
    assert_eq!(tracker.streak().current_streak, 0);
    assert_eq!(tracker.streak().best_streak, 5);
    assert_eq!(tracker.stats().current_streak, 0);
    assert!(!tracker.streak().is_on_track(later));
}

#[test]
fn test_lower_retention_cap_prunes_at_open_and_keeps_totals() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("wellness.db");
    let now = Utc.with_ymd_and_hms(2026, 6, 10, 7, 0, 0).unwrap();

    let totals_before = {
        let mut tracker = WellnessTracker::open(
            PersistedStore::new(SqliteBackend::new(db_path.clone()).unwrap()),
            TrackerConfig::default(),
        )
        .unwrap();
        for (n, category) in ["mood", "social", "exercise", "gratitude", "breathing"].iter().enumerate() {
            tracker
                .check_in(category, Some(today() - Duration::days(n as i64)), today(), now)
                .unwrap();
        }
        assert_eq!(tracker.log().len(), 5);
        tracker.totals().clone()
    };

    let tracker = WellnessTracker::open(
        PersistedStore::new(SqliteBackend::new(db_path).unwrap()),
        TrackerConfig {
            retention_cap: 2,
            ..TrackerConfig::default()
        },
    )
    .unwrap();

    assert_eq!(tracker.log().len(), 2);
    assert_eq!(tracker.totals(), &totals_before);
    assert_eq!(tracker.stats().category_variety, 5);
    assert_eq!(tracker.stats().active_days, 5);
    assert_eq!(tracker.stats().total_events, 5);
}
