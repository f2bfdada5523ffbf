//! Recurrence evaluation -- decides whether an event occurs on a calendar date.
//!
//! Everything here is a pure function of its inputs. Rules this version does
//! not recognize, and custom rules with a zero interval, never occur.

use chrono::{Datelike, NaiveDate};

use crate::event::{Event, RecurrenceRule, RecurrenceUnit};

/// Decide whether `event` occurs on `check`.
///
/// One-off events (no rule, or `none`) occur only on their own date. Recurring
/// events never occur before their anchor date or after an `end_date` cutoff.
pub fn occurs_on(event: &Event, check: NaiveDate) -> bool {
    let Some(rule) = event.recurrence.as_ref().filter(|r| r.is_recurring()) else {
        return check == event.date;
    };

    if check < event.date || rule.end_date().is_some_and(|cutoff| check > cutoff) {
        return false;
    }

    match rule {
        RecurrenceRule::None => check == event.date,
        RecurrenceRule::Daily { .. } => true,
        // Any date past the anchor is already in week zero or later, so
        // weekday membership is the whole test.
        RecurrenceRule::Weekly { days_of_week, .. } => {
            days_of_week.contains(&weekday_index(check))
        }
        // No rollover: an anchor on the 31st skips shorter months.
        RecurrenceRule::Monthly { .. } => check.day() == event.date.day(),
        RecurrenceRule::Custom { unit, interval, .. } => {
            custom_matches(*unit, *interval, event.date, check)
        }
        RecurrenceRule::Unrecognized(_) => false,
    }
}

/// Events occurring on `date`, ordered by time of day.
///
/// The sort is stable, so events sharing a time keep their input order.
pub fn expand_occurrences<'a, I>(events: I, date: NaiveDate) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut occurring: Vec<&Event> = events
        .into_iter()
        .filter(|event| occurs_on(event, date))
        .collect();
    occurring.sort_by_key(|event| event.time);
    occurring
}

/// Weekday of `date` as 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Signed number of Sunday-started week boundaries crossed from `from` to `to`.
///
/// Two dates in the same Sunday..Saturday week are zero weeks apart.
pub fn calendar_weeks_between(from: NaiveDate, to: NaiveDate) -> i64 {
    // Distance between the two week-starting Sundays, computed without
    // stepping outside the representable date range.
    let sundays_apart = days_between(from, to) - i64::from(weekday_index(to))
        + i64::from(weekday_index(from));
    sundays_apart / 7
}

/// Signed number of calendar months from `from` to `to`, ignoring day-of-month.
pub fn calendar_months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    month_ordinal(to) - month_ordinal(from)
}

fn custom_matches(
    unit: RecurrenceUnit,
    interval: u32,
    anchor: NaiveDate,
    check: NaiveDate,
) -> bool {
    if interval == 0 {
        return false;
    }
    let diff = match unit {
        RecurrenceUnit::Day => days_between(anchor, check),
        RecurrenceUnit::Week => calendar_weeks_between(anchor, check),
        RecurrenceUnit::Month => calendar_months_between(anchor, check),
    };
    diff >= 0 && diff % i64::from(interval) == 0
}

fn month_ordinal(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}
