/// Domain module containing core business logic and data types
///
/// This module defines the core entities (CompletionEvent, ActivityLog,
/// StreakState, achievements) and their validation rules. Everything here is
/// pure: "today" and "now" are always passed in by the caller.

pub mod types;
pub mod event;
pub mod activity_log;
pub mod streak;
pub mod achievement;

// Re-export public types for easy access
pub use types::*;
pub use event::*;
pub use activity_log::*;
pub use streak::*;
pub use achievement::*;

use thiserror::Error;

/// Errors that can occur during domain operations
///
/// These are raised at the call boundary, before any state is touched, so
/// a rejected operation is always a no-op.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid achievement definition: {0}")]
    InvalidDefinition(String),
}
