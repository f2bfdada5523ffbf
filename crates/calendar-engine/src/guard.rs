//! Mutation guard -- validates add, update, move, and delete intents.
//!
//! Every operation takes the current [`Calendar`] by reference and returns a
//! new one on success. A rejected intent leaves the caller's collection
//! untouched, so it can simply keep what it had.
//!
//! Time slots are unique per effective date: a recurring event occupies its
//! time on every date it occurs, so conflicts are found by expanding the
//! whole collection onto the target date.

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;

use crate::error::{Rejection, Result};
use crate::event::{Calendar, Event, EventDraft, EventId, RecurrenceRule};
use crate::recurrence::{expand_occurrences, occurs_on};

/// A draft that passed validation.
struct ValidDraft {
    date: NaiveDate,
    time: NaiveTime,
    title: String,
    description: String,
    recurrence: Option<RecurrenceRule>,
}

/// Add a new event. Returns the new collection and the id assigned to the event.
///
/// # Errors
/// - `Validation` if title, description, time, or date is missing or blank.
/// - `InvalidRecurrenceRule` if the rule cannot be evaluated.
/// - `DuplicateTime` if anything already occurs on the date at that time, or
///   if a recurring draft would land on a one-off event's date and time.
pub fn apply_add(calendar: &Calendar, draft: EventDraft) -> Result<(Calendar, EventId)> {
    add(calendar, draft).inspect_err(|r| log_rejection("add", r))
}

/// Replace every field of an existing event, keeping its id and position.
///
/// Validation matches [`apply_add`], except the event being edited never
/// conflicts with itself.
pub fn apply_update(calendar: &Calendar, id: EventId, draft: EventDraft) -> Result<Calendar> {
    update(calendar, id, draft).inspect_err(|r| log_rejection("update", r))
}

/// Move a one-off event to `new_date`. Time and everything else stay as they are.
///
/// # Errors
/// - `EventNotFound` for an unknown id.
/// - `RecurringMoveNotAllowed` for any event with a recurrence other than `none`.
/// - `DuplicateTime` if another event occurs on `new_date` at the same time.
pub fn apply_move(calendar: &Calendar, id: EventId, new_date: NaiveDate) -> Result<Calendar> {
    move_to(calendar, id, new_date).inspect_err(|r| log_rejection("move", r))
}

/// Remove an event. Unconditional: an unknown id yields an unchanged copy.
pub fn apply_delete(calendar: &Calendar, id: EventId) -> Calendar {
    let mut next = calendar.clone();
    match next.remove(id) {
        Some(removed) => debug!(id = %id, title = %removed.title, "event deleted"),
        None => debug!(id = %id, "delete of unknown event ignored"),
    }
    next
}

/// Check that `rule` can be evaluated when anchored at `anchor`.
///
/// # Errors
/// `InvalidRecurrenceRule` for a rule that could not be read (unknown type or
/// unit, negative interval, malformed weekday list), a zero interval, a
/// weekday index outside 0..=6, or an end date before the anchor.
pub fn validate_rule(rule: &RecurrenceRule, anchor: NaiveDate) -> Result<()> {
    let invalid = |reason: String| Err(Rejection::InvalidRecurrenceRule { reason });

    match rule {
        RecurrenceRule::None | RecurrenceRule::Daily { .. } | RecurrenceRule::Monthly { .. } => {}
        RecurrenceRule::Weekly { days_of_week, .. } => {
            if let Some(bad) = days_of_week.iter().find(|&&d| d > 6) {
                return invalid(format!("weekday index {} is outside 0..=6", bad));
            }
        }
        RecurrenceRule::Custom { interval, .. } => {
            if *interval < 1 {
                return invalid("interval must be at least 1".to_string());
            }
        }
        RecurrenceRule::Unrecognized(_) => {
            return invalid(rule.unrecognized_reason().unwrap_or_default());
        }
    }

    if let Some(cutoff) = rule.end_date() {
        if cutoff < anchor {
            return invalid(format!("end date {} is before start date {}", cutoff, anchor));
        }
    }
    Ok(())
}

fn add(calendar: &Calendar, draft: EventDraft) -> Result<(Calendar, EventId)> {
    let valid = validate_draft(draft)?;
    ensure_slot_free(calendar, valid.date, valid.time, None)?;
    ensure_clear_of_one_offs(calendar, &valid, calendar.next_id())?;

    let mut next = calendar.clone();
    let id = next.insert_new(
        valid.date,
        valid.time,
        valid.title,
        valid.description,
        valid.recurrence,
    );
    debug!(id = %id, "event added");
    Ok((next, id))
}

fn update(calendar: &Calendar, id: EventId, draft: EventDraft) -> Result<Calendar> {
    if !calendar.contains(id) {
        return Err(Rejection::EventNotFound { id });
    }
    let valid = validate_draft(draft)?;
    ensure_slot_free(calendar, valid.date, valid.time, Some(id))?;
    ensure_clear_of_one_offs(calendar, &valid, id)?;

    let mut next = calendar.clone();
    let event = next.get_mut(id).ok_or(Rejection::EventNotFound { id })?;
    event.date = valid.date;
    event.time = valid.time;
    event.title = valid.title;
    event.description = valid.description;
    event.recurrence = valid.recurrence;
    debug!(id = %id, "event updated");
    Ok(next)
}

fn move_to(calendar: &Calendar, id: EventId, new_date: NaiveDate) -> Result<Calendar> {
    let event = calendar.get(id).ok_or(Rejection::EventNotFound { id })?;
    if event.is_recurring() {
        return Err(Rejection::RecurringMoveNotAllowed { id });
    }
    ensure_slot_free(calendar, new_date, event.time, Some(id))?;

    let mut next = calendar.clone();
    let moved = next.get_mut(id).ok_or(Rejection::EventNotFound { id })?;
    let from = moved.date;
    moved.date = new_date;
    debug!(id = %id, %from, to = %new_date, "event moved");
    Ok(next)
}

fn validate_draft(draft: EventDraft) -> Result<ValidDraft> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(Rejection::Validation { field: "title" });
    }
    let description = draft.description.trim();
    if description.is_empty() {
        return Err(Rejection::Validation {
            field: "description",
        });
    }
    let time = draft.time.ok_or(Rejection::Validation { field: "time" })?;
    let date = draft.date.ok_or(Rejection::Validation { field: "date" })?;

    if let Some(rule) = &draft.recurrence {
        validate_rule(rule, date)?;
    }

    Ok(ValidDraft {
        date,
        time,
        title: title.to_string(),
        description: description.to_string(),
        recurrence: draft.recurrence,
    })
}

/// Reject if any event other than `exclude` occurs on `date` at `time`.
fn ensure_slot_free(
    calendar: &Calendar,
    date: NaiveDate,
    time: NaiveTime,
    exclude: Option<EventId>,
) -> Result<()> {
    let taken = expand_occurrences(calendar, date)
        .into_iter()
        .find(|event| Some(event.id) != exclude && event.time == time);

    match taken {
        Some(event) => Err(Rejection::DuplicateTime {
            date,
            time,
            conflicting: event.id,
        }),
        None => Ok(()),
    }
}

/// Reject a recurring draft that would occur on the date of a stored one-off
/// event at the same time. `id` is the draft's own id, which never conflicts.
fn ensure_clear_of_one_offs(calendar: &Calendar, valid: &ValidDraft, id: EventId) -> Result<()> {
    let Some(rule) = valid.recurrence.as_ref().filter(|r| r.is_recurring()) else {
        return Ok(());
    };
    let candidate = Event {
        id,
        date: valid.date,
        time: valid.time,
        title: valid.title.clone(),
        description: valid.description.clone(),
        recurrence: Some(rule.clone()),
    };

    let taken = calendar.iter().find(|event| {
        event.id != id
            && !event.is_recurring()
            && event.time == valid.time
            && occurs_on(&candidate, event.date)
    });

    match taken {
        Some(event) => Err(Rejection::DuplicateTime {
            date: event.date,
            time: valid.time,
            conflicting: event.id,
        }),
        None => Ok(()),
    }
}

fn log_rejection(operation: &str, rejection: &Rejection) {
    debug!(operation, reason = %rejection, "mutation rejected");
}
