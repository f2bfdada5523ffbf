//! Error types for calendar-engine operations.
//!
//! A [`Rejection`] is a decision, not a fault: the guard returns it as a value
//! and the caller keeps its previous collection. [`StoreError`] covers the
//! persistence collaborator.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::event::EventId;

/// Why a proposed mutation was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Rejection {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Validation { field: &'static str },

    /// The target date already has an occurrence at the requested time.
    #[error("another event ({conflicting}) already occupies {date} at {}", .time.format("%H:%M"))]
    DuplicateTime {
        date: NaiveDate,
        #[serde(serialize_with = "crate::event::hhmm::serialize")]
        time: NaiveTime,
        conflicting: EventId,
    },

    /// Recurring events cannot be relocated by moving their anchor.
    #[error("event {id} is recurring and cannot be moved")]
    RecurringMoveNotAllowed { id: EventId },

    /// A rule that could not be read, `interval < 1`, a weekday past 6, or an unusable cutoff.
    #[error("invalid recurrence rule: {reason}")]
    InvalidRecurrenceRule { reason: String },

    #[error("no event with id {id}")]
    EventNotFound { id: EventId },
}

/// Errors from loading or saving the event collection.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parsed but violates a collection invariant.
    #[error("corrupt event store: {0}")]
    Corrupt(String),
}

/// Convenience alias for guard results.
pub type Result<T> = std::result::Result<T, Rejection>;
