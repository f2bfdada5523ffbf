//! Plain-text rendering of events, days, and month grids.

use calendar_engine::{Event, MonthView};
use chrono::NaiveDate;

/// One line per event: `#id  date time  title  [rule]`.
pub fn event_line(event: &Event) -> String {
    let rule = event
        .recurrence
        .as_ref()
        .map(|r| r.describe())
        .unwrap_or_else(|| "once".to_string());
    format!(
        "{:<5} {} {}  {}  [{}]",
        event.id.to_string(),
        event.date,
        event.time.format("%H:%M"),
        event.title,
        rule
    )
}

/// The ordered occurrences of a single day.
pub fn day(date: NaiveDate, events: &[&Event]) -> String {
    if events.is_empty() {
        return format!("No events on {}.\n", date);
    }
    let mut lines = vec![format!("Events on {}:", date)];
    for event in events {
        let mut line = format!(
            "  {}  {:<5} {}",
            event.time.format("%H:%M"),
            event.id.to_string(),
            event.title
        );
        if !event.description.is_empty() {
            line.push_str(" - ");
            line.push_str(&event.description);
        }
        lines.push(line);
    }
    finish(lines)
}

/// A Sunday-first grid followed by the month's agenda.
///
/// Each in-month day shows its number of occurrences, e.g. `15(2)`; days
/// outside the month are dimmed to `.`.
pub fn month(view: &MonthView<'_>) -> String {
    let mut lines = Vec::new();
    lines.push(match NaiveDate::from_ymd_opt(view.year, view.month, 1) {
        Some(first) => first.format("%B %Y").to_string(),
        None => format!("{}-{:02}", view.year, view.month),
    });
    lines.push(grid_row(WEEKDAYS.iter().map(|name| (name.to_string(), String::new()))));

    for week in &view.weeks {
        lines.push(grid_row(week.iter().map(|cell| {
            if !cell.in_month {
                return (".".to_string(), String::new());
            }
            let count = match cell.events.len() {
                0 => String::new(),
                n => format!("({})", n),
            };
            (cell.date.format("%-d").to_string(), count)
        })));
    }

    let agenda: Vec<String> = view
        .days()
        .filter(|cell| cell.in_month)
        .flat_map(|cell| {
            cell.events.iter().map(move |event| {
                format!(
                    "  {} {}  {}",
                    cell.date,
                    event.time.format("%H:%M"),
                    event.title
                )
            })
        })
        .collect();

    if !agenda.is_empty() {
        lines.push(String::new());
        lines.extend(agenda);
    }
    finish(lines)
}

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Seven `(label, suffix)` cells, each seven columns wide.
fn grid_row(cells: impl Iterator<Item = (String, String)>) -> String {
    cells
        .map(|(label, suffix)| format!("{:>4}{:<3}", label, suffix))
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn finish(mut lines: Vec<String>) -> String {
    lines.push(String::new());
    lines.join("\n")
}
