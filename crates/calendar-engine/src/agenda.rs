//! Presentation-facing queries: per-day occurrences over a range, and the
//! Sunday-first month grid a calendar view draws.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::event::{Calendar, Event};
use crate::recurrence::{expand_occurrences, weekday_index};

/// One cell of a month grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell<'a> {
    pub date: NaiveDate,
    /// False for the leading and trailing days borrowed from adjacent months.
    pub in_month: bool,
    /// Occurrences on this date, ordered by time.
    pub events: Vec<&'a Event>,
}

/// A month laid out as whole Sunday..Saturday weeks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView<'a> {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<[DayCell<'a>; 7]>,
}

impl<'a> MonthView<'a> {
    /// All cells in display order.
    pub fn days(&self) -> impl Iterator<Item = &DayCell<'a>> {
        self.weeks.iter().flat_map(|week| week.iter())
    }
}

/// Occurrences for every date in `from..=to` that has at least one.
///
/// An inverted range yields an empty map.
pub fn occurrences_between(
    calendar: &Calendar,
    from: NaiveDate,
    to: NaiveDate,
) -> BTreeMap<NaiveDate, Vec<&Event>> {
    from.iter_days()
        .take_while(|day| *day <= to)
        .filter_map(|day| {
            let events = expand_occurrences(calendar, day);
            (!events.is_empty()).then_some((day, events))
        })
        .collect()
}

/// Lay out `year`-`month` as a Sunday-first grid with each day's occurrences.
///
/// Returns `None` if the year/month pair is not a valid date, or if the grid
/// would spill past the first or last representable date.
pub fn month_view(calendar: &Calendar, year: i32, month: u32) -> Option<MonthView<'_>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = last_day_of_month(first)?;

    let grid_start = first.checked_sub_days(Days::new(u64::from(weekday_index(first))))?;
    let grid_end = last.checked_add_days(Days::new(u64::from(6 - weekday_index(last))))?;

    let cells: Vec<DayCell<'_>> = grid_start
        .iter_days()
        .take_while(|day| *day <= grid_end)
        .map(|date| DayCell {
            date,
            in_month: date.month() == month && date.year() == year,
            events: expand_occurrences(calendar, date),
        })
        .collect();

    let mut weeks = Vec::with_capacity(cells.len() / 7);
    let mut cells = cells.into_iter();
    loop {
        let week: Vec<DayCell<'_>> = cells.by_ref().take(7).collect();
        match <[DayCell<'_>; 7]>::try_from(week) {
            Ok(week) => weeks.push(week),
            Err(_) => break,
        }
    }

    Some(MonthView { year, month, weeks })
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
