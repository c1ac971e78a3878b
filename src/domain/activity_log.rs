/// Activity log and lifetime totals
///
/// The ActivityLog is the append-only, capped history of completion events.
/// LifetimeTotals keeps the counters that must survive log pruning: distinct
/// active dates, lifetime event count and every category ever seen.

use std::collections::{BTreeMap, BTreeSet};
use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{Category, CompletionEvent, EventId};

/// Default number of events retained in the log
pub const DEFAULT_RETENTION_CAP: usize = 1000;

/// Append-only history of completion events, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityLog {
    events: Vec<CompletionEvent>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a completion event for `date` and prune to `max_entries`
    ///
    /// The caller is responsible for validating the category and date; this
    /// layer never rejects an append.
    pub fn append(
        &mut self,
        category: Category,
        date: NaiveDate,
        logged_at: DateTime<Utc>,
        max_entries: usize,
    ) -> CompletionEvent {
        let last_id = self.events.last().map(|e| e.id);
        let id = EventId::next(logged_at.timestamp_millis(), last_id);
        let event = CompletionEvent::new(id, category, date, logged_at);

        self.events.push(event.clone());
        let dropped = self.prune_to_capacity(max_entries);
        if dropped > 0 {
            tracing::debug!("Pruned {} old events from activity log", dropped);
        }

        event
    }

    /// All events logged for a calendar date, in insertion order
    pub fn events_on_date(&self, date: NaiveDate) -> Vec<&CompletionEvent> {
        self.events.iter().filter(|e| e.date == date).collect()
    }

    /// All events whose date falls in `start..=end`
    pub fn events_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&CompletionEvent> {
        self.events
            .iter()
            .filter(|e| e.date >= start && e.date <= end)
            .collect()
    }

    /// Drop the oldest events beyond `max_entries`, returning how many went
    pub fn prune_to_capacity(&mut self, max_entries: usize) -> usize {
        if self.events.len() <= max_entries {
            return 0;
        }
        let excess = self.events.len() - max_entries;
        self.events.drain(..excess);
        excess
    }

    pub fn distinct_dates(&self) -> BTreeSet<NaiveDate> {
        self.events.iter().map(|e| e.date).collect()
    }

    pub fn distinct_categories(&self) -> BTreeSet<Category> {
        self.events.iter().map(|e| e.category.clone()).collect()
    }

    /// Count of events per category
    pub fn counts_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompletionEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Counters that are independent of log retention
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifetimeTotals {
    /// Every distinct calendar date that ever had an event
    #[serde(default)]
    pub active_dates: BTreeSet<NaiveDate>,
    /// Every event ever appended, including pruned ones
    #[serde(default)]
    pub total_events: u64,
    /// Every category ever logged
    #[serde(default)]
    pub categories_seen: BTreeSet<Category>,
}

impl LifetimeTotals {
    /// Record one newly appended event
    ///
    /// Returns true when the event's date had never been active before.
    pub fn record(&mut self, event: &CompletionEvent) -> bool {
        self.total_events += 1;
        self.categories_seen.insert(event.category.clone());
        self.active_dates.insert(event.date)
    }

    /// Fold a loaded log into the totals
    ///
    /// Covers logs persisted before totals existed, or totals that failed to
    /// save while the log did.
    pub fn reconcile(&mut self, log: &ActivityLog) {
        self.active_dates.extend(log.distinct_dates());
        self.categories_seen.extend(log.distinct_categories());
        self.total_events = self.total_events.max(log.len() as u64);
    }

    pub fn active_days(&self) -> u32 {
        self.active_dates.len() as u32
    }

    pub fn category_variety(&self) -> u32 {
        self.categories_seen.len() as u32
    }
}
