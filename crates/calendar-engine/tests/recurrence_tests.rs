//! Tests for recurrence evaluation: `occurs_on`, `expand_occurrences`, and the
//! unit-distance helpers.

use calendar_engine::recurrence::{
    calendar_months_between, calendar_weeks_between, days_between, weekday_index,
};
use calendar_engine::{
    expand_occurrences, occurs_on, Event, EventId, RecurrenceRule, RecurrenceUnit,
};
use chrono::{NaiveDate, NaiveTime};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn event(id: u64, anchor: NaiveDate, at: NaiveTime, rule: Option<RecurrenceRule>) -> Event {
    Event {
        id: EventId(id),
        date: anchor,
        time: at,
        title: format!("event {}", id),
        description: "details".to_string(),
        recurrence: rule,
    }
}

// ---------------------------------------------------------------------------
// One-off events
// ---------------------------------------------------------------------------

#[test]
fn one_off_occurs_only_on_its_date() {
    let e = event(0, date(2025, 6, 25), time(9, 0), None);

    assert!(occurs_on(&e, date(2025, 6, 25)));
    assert!(!occurs_on(&e, date(2025, 6, 24)));
    assert!(!occurs_on(&e, date(2025, 6, 26)));
}

#[test]
fn explicit_none_rule_behaves_like_one_off() {
    let e = event(0, date(2025, 6, 25), time(9, 0), Some(RecurrenceRule::None));

    assert!(occurs_on(&e, date(2025, 6, 25)));
    assert!(!occurs_on(&e, date(2025, 6, 26)));
}

// ---------------------------------------------------------------------------
// Daily
// ---------------------------------------------------------------------------

#[test]
fn daily_occurs_every_day_from_anchor() {
    let e = event(
        0,
        date(2025, 6, 25),
        time(9, 0),
        Some(RecurrenceRule::Daily { end_date: None }),
    );

    assert!(!occurs_on(&e, date(2025, 6, 24)), "never before the anchor");
    assert!(occurs_on(&e, date(2025, 6, 25)));
    assert!(occurs_on(&e, date(2025, 6, 26)));
    assert!(occurs_on(&e, date(2026, 2, 28)));
}

#[test]
fn end_date_is_an_inclusive_cutoff() {
    let rule = RecurrenceRule::Daily { end_date: None }.until(date(2025, 6, 30));
    let e = event(0, date(2025, 6, 25), time(9, 0), Some(rule));

    assert!(occurs_on(&e, date(2025, 6, 30)), "cutoff day itself occurs");
    assert!(!occurs_on(&e, date(2025, 7, 1)));
}

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

#[test]
fn weekly_matches_listed_weekdays_only() {
    // 2025-06-27 is a Friday; Mon(1) and Fri(5).
    let e = event(
        0,
        date(2025, 6, 27),
        time(10, 15),
        Some(RecurrenceRule::weekly([1, 5])),
    );

    assert!(occurs_on(&e, date(2025, 6, 27)));
    assert!(occurs_on(&e, date(2025, 6, 30)), "Monday");
    assert!(!occurs_on(&e, date(2025, 7, 1)), "Tuesday");
    assert!(occurs_on(&e, date(2025, 7, 4)), "next Friday");
    assert!(!occurs_on(&e, date(2025, 6, 23)), "Monday before the anchor");
}

#[test]
fn weekly_includes_later_days_of_the_anchor_week() {
    // Anchor Wednesday 2025-06-25, rule lists Friday: the Friday of the same
    // week must occur.
    let e = event(
        0,
        date(2025, 6, 25),
        time(10, 0),
        Some(RecurrenceRule::weekly([5])),
    );

    assert!(occurs_on(&e, date(2025, 6, 27)));
}

#[test]
fn weekly_with_no_days_never_occurs() {
    let e = event(
        0,
        date(2025, 6, 25),
        time(10, 0),
        Some(RecurrenceRule::weekly([])),
    );

    for offset in 0..14 {
        let day = date(2025, 6, 25) + chrono::Duration::days(offset);
        assert!(!occurs_on(&e, day), "{} should not occur", day);
    }
}

// ---------------------------------------------------------------------------
// Monthly
// ---------------------------------------------------------------------------

#[test]
fn monthly_on_the_31st_skips_short_months() {
    let e = event(
        0,
        date(2025, 1, 31),
        time(8, 0),
        Some(RecurrenceRule::Monthly { end_date: None }),
    );

    assert!(occurs_on(&e, date(2025, 1, 31)));
    assert!(!occurs_on(&e, date(2025, 2, 28)), "no rollover into February");
    assert!(occurs_on(&e, date(2025, 3, 31)));
    assert!(!occurs_on(&e, date(2025, 4, 30)));
    assert!(occurs_on(&e, date(2025, 5, 31)));
}

#[test]
fn monthly_matches_day_of_month_across_years() {
    let e = event(
        0,
        date(2025, 11, 15),
        time(8, 0),
        Some(RecurrenceRule::Monthly { end_date: None }),
    );

    assert!(occurs_on(&e, date(2026, 1, 15)));
    assert!(!occurs_on(&e, date(2026, 1, 16)));
    assert!(!occurs_on(&e, date(2025, 10, 15)));
}

// ---------------------------------------------------------------------------
// Custom
// ---------------------------------------------------------------------------

#[test]
fn custom_every_three_days() {
    let e = event(
        0,
        date(2025, 6, 1),
        time(7, 30),
        Some(RecurrenceRule::custom(RecurrenceUnit::Day, 3)),
    );

    assert!(occurs_on(&e, date(2025, 6, 1)));
    assert!(!occurs_on(&e, date(2025, 6, 2)));
    assert!(!occurs_on(&e, date(2025, 6, 3)));
    assert!(occurs_on(&e, date(2025, 6, 4)));
    assert!(occurs_on(&e, date(2025, 7, 1)), "30 days later");
}

#[test]
fn custom_every_two_months() {
    let e = event(
        0,
        date(2025, 1, 15),
        time(12, 0),
        Some(RecurrenceRule::custom(RecurrenceUnit::Month, 2)),
    );

    assert!(occurs_on(&e, date(2025, 3, 15)));
    assert!(occurs_on(&e, date(2025, 5, 15)));
    assert!(!occurs_on(&e, date(2025, 2, 15)));
    assert!(!occurs_on(&e, date(2025, 4, 15)));
    assert!(occurs_on(&e, date(2026, 1, 15)), "crosses the year boundary");
}

#[test]
fn custom_month_distance_ignores_day_of_month() {
    // Month distance is year*12+month arithmetic, so any day of an eligible
    // month is a whole number of intervals away.
    let e = event(
        0,
        date(2025, 1, 15),
        time(12, 0),
        Some(RecurrenceRule::custom(RecurrenceUnit::Month, 2)),
    );

    assert!(occurs_on(&e, date(2025, 3, 1)));
    assert!(!occurs_on(&e, date(2025, 1, 14)), "still never before the anchor");
}

#[test]
fn custom_every_two_weeks_counts_calendar_weeks() {
    // Anchor Wednesday 2025-06-25; its week starts Sunday 2025-06-22.
    let e = event(
        0,
        date(2025, 6, 25),
        time(12, 0),
        Some(RecurrenceRule::custom(RecurrenceUnit::Week, 2)),
    );

    assert!(occurs_on(&e, date(2025, 6, 28)), "same calendar week");
    assert!(!occurs_on(&e, date(2025, 6, 29)), "week one");
    assert!(!occurs_on(&e, date(2025, 7, 5)), "still week one");
    assert!(occurs_on(&e, date(2025, 7, 6)), "week two starts on Sunday");
    assert!(occurs_on(&e, date(2025, 7, 9)));
}

#[test]
fn custom_rule_respects_end_date() {
    let rule = RecurrenceRule::custom(RecurrenceUnit::Day, 1).until(date(2025, 6, 3));
    let e = event(0, date(2025, 6, 1), time(7, 30), Some(rule));

    assert!(occurs_on(&e, date(2025, 6, 3)));
    assert!(!occurs_on(&e, date(2025, 6, 4)));
}

#[test]
fn zero_interval_never_occurs() {
    let e = event(
        0,
        date(2025, 6, 1),
        time(7, 30),
        Some(RecurrenceRule::custom(RecurrenceUnit::Day, 0)),
    );

    assert!(!occurs_on(&e, date(2025, 6, 1)));
    assert!(!occurs_on(&e, date(2025, 6, 2)));
}

#[test]
fn unrecognized_rules_fail_closed() {
    let raw_rules = [
        serde_json::json!({"type": "yearly"}),
        serde_json::json!({"type": "custom", "unit": "fortnight", "interval": 1}),
        serde_json::json!({"type": "custom", "unit": "day", "interval": -1}),
    ];

    for (i, raw) in raw_rules.into_iter().enumerate() {
        let e = event(i as u64, date(2025, 6, 1), time(7, 30), Some(RecurrenceRule::Unrecognized(raw)));
        assert!(!occurs_on(&e, date(2025, 6, 1)), "not even on the anchor");
        assert!(!occurs_on(&e, date(2025, 6, 2)));
    }
}

// ---------------------------------------------------------------------------
// expand_occurrences
// ---------------------------------------------------------------------------

#[test]
fn expand_filters_and_orders_by_time() {
    let day = date(2025, 7, 4);
    let events = vec![
        event(0, day, time(14, 0), None),
        event(1, date(2025, 6, 27), time(10, 15), Some(RecurrenceRule::weekly([5]))),
        event(2, date(2025, 7, 3), time(9, 0), None),
        event(3, date(2025, 7, 1), time(8, 45), Some(RecurrenceRule::Daily { end_date: None })),
    ];

    let ids: Vec<u64> = expand_occurrences(&events, day)
        .into_iter()
        .map(|e| e.id.0)
        .collect();

    assert_eq!(ids, vec![3, 1, 0]);
}

#[test]
fn expand_keeps_input_order_for_equal_times() {
    let day = date(2025, 7, 4);
    let events = vec![
        event(7, day, time(9, 0), None),
        event(3, day, time(9, 0), None),
        event(5, day, time(8, 0), None),
    ];

    let ids: Vec<u64> = expand_occurrences(&events, day)
        .into_iter()
        .map(|e| e.id.0)
        .collect();

    assert_eq!(ids, vec![5, 7, 3]);
}

#[test]
fn expand_on_empty_day_is_empty() {
    let events = vec![event(0, date(2025, 7, 4), time(9, 0), None)];
    assert!(expand_occurrences(&events, date(2025, 7, 5)).is_empty());
}

// ---------------------------------------------------------------------------
// Distance helpers
// ---------------------------------------------------------------------------

#[test]
fn weekday_index_is_sunday_based() {
    assert_eq!(weekday_index(date(2025, 6, 22)), 0, "Sunday");
    assert_eq!(weekday_index(date(2025, 6, 27)), 5, "Friday");
    assert_eq!(weekday_index(date(2025, 6, 28)), 6, "Saturday");
}

#[test]
fn distances_are_signed() {
    assert_eq!(days_between(date(2025, 6, 25), date(2025, 7, 5)), 10);
    assert_eq!(days_between(date(2025, 7, 5), date(2025, 6, 25)), -10);

    // Saturday to the next day (Sunday) crosses a week boundary.
    assert_eq!(calendar_weeks_between(date(2025, 6, 28), date(2025, 6, 29)), 1);
    assert_eq!(calendar_weeks_between(date(2025, 6, 22), date(2025, 6, 28)), 0);
    assert_eq!(calendar_weeks_between(date(2025, 6, 29), date(2025, 6, 28)), -1);

    assert_eq!(calendar_months_between(date(2025, 1, 31), date(2025, 2, 1)), 1);
    assert_eq!(calendar_months_between(date(2025, 11, 1), date(2026, 1, 31)), 2);
    assert_eq!(calendar_months_between(date(2026, 1, 1), date(2025, 12, 31)), -1);
}

#[test]
fn week_distance_at_the_ends_of_the_date_range() {
    assert_eq!(calendar_weeks_between(NaiveDate::MIN, NaiveDate::MIN), 0);
    assert_eq!(calendar_weeks_between(NaiveDate::MAX, NaiveDate::MAX), 0);
    assert!(calendar_weeks_between(NaiveDate::MIN, NaiveDate::MAX) > 0);

    let e = event(
        0,
        NaiveDate::MIN,
        time(7, 30),
        Some(RecurrenceRule::custom(RecurrenceUnit::Week, 1)),
    );
    assert!(occurs_on(&e, NaiveDate::MIN));
}
