/// Wellness tracker context
///
/// `WellnessTracker` owns every collection in memory for the session. It is
/// built once from a store and a configuration, and each mutating operation
/// runs the whole pipeline: append, recompute streaks, evaluate achievements,
/// persist. Callers pass "today" and "now" explicitly.

use std::collections::BTreeSet;
use chrono::{DateTime, NaiveDate, Utc};

use crate::analytics::{ProgressAggregator, ProgressReport};
use crate::config::TrackerConfig;
use crate::domain::{
    unlocked_ids, AchievementEvaluator, ActivityLog, CompletionEvent, DomainError,
    LifetimeTotals, ProgressStats, StreakState, UnlockedAchievement,
};
use crate::storage::{keys, KeyValueBackend, PersistedStore};
use crate::TrackerError;

/// Result of a successful check-in
#[derive(Debug, Clone)]
pub struct CheckInOutcome {
    pub event: CompletionEvent,
    /// Whether this was the first completion on the event's date
    pub new_active_day: bool,
    pub streak: StreakState,
    pub newly_unlocked: Vec<UnlockedAchievement>,
}

pub struct WellnessTracker<B: KeyValueBackend> {
    store: PersistedStore<B>,
    config: TrackerConfig,
    evaluator: AchievementEvaluator,
    aggregator: ProgressAggregator,
    log: ActivityLog,
    totals: LifetimeTotals,
    streak: StreakState,
    unlocked: Vec<UnlockedAchievement>,
}

impl<B: KeyValueBackend> WellnessTracker<B> {
    /// Load every collection from `store`
    ///
    /// Only an invalid configuration can fail here; unreadable collections
    /// start from their empty defaults.
    ///
    /// The streak is served as it was persisted. Call `refresh` with the
    /// current day before reading `streak()` or `stats()`, otherwise a
    /// streak that lapsed since the last session still shows its old count.
    pub fn open(store: PersistedStore<B>, config: TrackerConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        let evaluator = AchievementEvaluator::new(config.achievements.clone())?;

        let mut log: ActivityLog = store.load(keys::ACTIVITY_LOG, ActivityLog::new());
        let mut totals: LifetimeTotals = store.load(keys::LIFETIME_TOTALS, LifetimeTotals::default());
        let streak: StreakState = store.load(keys::STREAK_STATE, StreakState::new());
        let stored_unlocked: Vec<UnlockedAchievement> =
            store.load(keys::UNLOCKED_ACHIEVEMENTS, Vec::new());

        totals.reconcile(&log);
        log.prune_to_capacity(config.retention_cap);

        // Keep the earliest record per achievement id
        let mut seen = BTreeSet::new();
        let unlocked: Vec<UnlockedAchievement> = stored_unlocked
            .into_iter()
            .filter(|u| seen.insert(u.achievement_id.clone()))
            .collect();

        tracing::info!(
            "Tracker loaded: {} events retained, {} active days, {} achievements unlocked",
            log.len(),
            totals.active_days(),
            unlocked.len()
        );

        Ok(Self {
            store,
            config,
            evaluator,
            aggregator: ProgressAggregator::new(),
            log,
            totals,
            streak,
            unlocked,
        })
    }

    /// Record a completion for `category`
    ///
    /// `date` defaults to `today`; past dates are backfills. Invalid input is
    /// rejected before anything is touched.
    pub fn check_in(
        &mut self,
        category: &str,
        date: Option<NaiveDate>,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<CheckInOutcome, DomainError> {
        let category = self.config.resolve_category(category)?;
        let date = date.unwrap_or(today);
        CompletionEvent::validate_date(date, today)?;

        let event = self.log.append(category, date, now, self.config.retention_cap);
        let new_active_day = self.totals.record(&event);

        self.streak = StreakState::calculate(&self.totals.active_dates, today, &self.streak);
        let newly_unlocked = self.evaluate_pending(now);

        tracing::debug!(
            "Check-in {} ({}) on {}: current streak {}, {} new achievements",
            event.id,
            event.category,
            event.date,
            self.streak.current_streak,
            newly_unlocked.len()
        );

        self.store.save(keys::ACTIVITY_LOG, &self.log);
        self.store.save(keys::LIFETIME_TOTALS, &self.totals);
        self.store.save(keys::STREAK_STATE, &self.streak);
        if !newly_unlocked.is_empty() {
            self.store.save(keys::UNLOCKED_ACHIEVEMENTS, &self.unlocked);
        }

        Ok(CheckInOutcome {
            event,
            new_active_day,
            streak: self.streak.clone(),
            newly_unlocked,
        })
    }

    /// Bring derived state up to date for `today` without logging anything
    ///
    /// A streak whose last check-in is older than yesterday drops to zero,
    /// and achievements added to the configuration since the last session
    /// are granted if already earned. Returns the newly unlocked ones.
    pub fn refresh(&mut self, today: NaiveDate, now: DateTime<Utc>) -> Vec<UnlockedAchievement> {
        let streak = StreakState::calculate(&self.totals.active_dates, today, &self.streak);
        if streak != self.streak {
            self.streak = streak;
            self.store.save(keys::STREAK_STATE, &self.streak);
        }

        let newly_unlocked = self.evaluate_pending(now);
        if !newly_unlocked.is_empty() {
            self.store.save(keys::UNLOCKED_ACHIEVEMENTS, &self.unlocked);
        }
        newly_unlocked
    }

    /// Aggregated statistics used for achievements and display
    pub fn stats(&self) -> ProgressStats {
        ProgressStats::from_parts(&self.streak, &self.totals)
    }

    /// Progress report for presentation
    pub fn progress_report(&self, today: NaiveDate, days: usize) -> ProgressReport {
        self.aggregator.build_report(
            &self.log,
            &self.stats(),
            &self.evaluator,
            &self.unlocked_ids(),
            today,
            days,
        )
    }

    pub fn events_on_date(&self, date: NaiveDate) -> Vec<&CompletionEvent> {
        self.log.events_on_date(date)
    }

    pub fn unlocked_ids(&self) -> BTreeSet<String> {
        unlocked_ids(&self.unlocked)
    }

    pub fn total_points(&self) -> u64 {
        self.evaluator.total_points(&self.unlocked_ids())
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn totals(&self) -> &LifetimeTotals {
        &self.totals
    }

    pub fn unlocked(&self) -> &[UnlockedAchievement] {
        &self.unlocked
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &AchievementEvaluator {
        &self.evaluator
    }

    pub fn store(&self) -> &PersistedStore<B> {
        &self.store
    }

    /// Evaluate achievements against current stats and record new unlocks
    fn evaluate_pending(&mut self, now: DateTime<Utc>) -> Vec<UnlockedAchievement> {
        let newly = self
            .evaluator
            .evaluate(&self.stats(), &self.unlocked_ids(), now);
        self.unlocked.extend(newly.iter().cloned());
        newly
    }
}
