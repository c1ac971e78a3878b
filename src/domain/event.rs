/// CompletionEvent entity for tracking activity completions
///
/// This module defines the CompletionEvent struct that represents a single
/// instance of finishing a wellness activity on a specific calendar day.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use crate::domain::{Category, DomainError, EventId};

/// How far back a completion may be backfilled
pub const MAX_BACKFILL_DAYS: i64 = 365;

/// A record of completing an activity on a specific day
///
/// Events are immutable once created. Only the calendar `date` matters for
/// streak math; `logged_at` is kept for display and ordering diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Unique identifier, increasing in insertion order
    pub id: EventId,
    /// Which activity category this completion belongs to
    pub category: Category,
    /// Which local calendar day this completion was for
    pub date: NaiveDate,
    /// When this event was created
    pub logged_at: DateTime<Utc>,
}

impl CompletionEvent {
    pub fn new(
        id: EventId,
        category: Category,
        date: NaiveDate,
        logged_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            category,
            date,
            logged_at,
        }
    }

    /// Validate that a completion date is loggable relative to `today`
    ///
    /// Future dates are rejected, as are dates more than a year back.
    pub fn validate_date(date: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
        if date > today {
            return Err(DomainError::InvalidDate(
                "Cannot log activities for future dates".to_string()
            ));
        }

        let earliest = today - Duration::days(MAX_BACKFILL_DAYS);
        if date < earliest {
            return Err(DomainError::InvalidDate(format!(
                "Cannot log activities more than {} days in the past", MAX_BACKFILL_DAYS
            )));
        }

        Ok(())
    }

    /// Parse a `YYYY-MM-DD` date string
    pub fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| DomainError::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", raw)))
    }
}
