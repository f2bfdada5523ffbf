//! # calendar-engine
//!
//! Deterministic recurrence evaluation and time-slot conflict guarding for a
//! personal calendar.
//!
//! Given an event (an anchor date, a time of day, and an optional recurrence
//! rule) the engine decides which calendar dates it occurs on, and it validates
//! add/update/move/delete intents against the whole collection so that a date
//! being written never ends up with two events at the same time. All dates are
//! naive local calendar dates, and the core performs no I/O.
//!
//! ## Modules
//!
//! - [`event`] -- `Event`, `EventDraft`, `RecurrenceRule`, and the `Calendar` collection
//! - [`recurrence`] -- `occurs_on` and `expand_occurrences`
//! - [`guard`] -- `apply_add`, `apply_update`, `apply_move`, `apply_delete`
//! - [`agenda`] -- per-day occurrence maps and the month grid
//! - [`store`] -- JSON file persistence
//! - [`error`] -- Error types

pub mod agenda;
pub mod error;
pub mod event;
pub mod guard;
pub mod recurrence;
pub mod store;

pub use agenda::{month_view, occurrences_between, DayCell, MonthView};
pub use error::{Rejection, StoreError};
pub use event::{Calendar, Event, EventDraft, EventId, RecurrenceRule, RecurrenceUnit};
pub use guard::{apply_add, apply_delete, apply_move, apply_update, validate_rule};
pub use recurrence::{expand_occurrences, occurs_on};
pub use store::EventStore;
