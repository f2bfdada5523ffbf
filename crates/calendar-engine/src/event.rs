//! Event model: identifiers, recurrence rules, drafts, and the calendar collection.
//!
//! Dates are naive local calendar dates (`YYYY-MM-DD`), times are naive
//! wall-clock times serialized as `HH:MM`. Field names on the wire are
//! camelCase so the JSON matches what a browser UI stores.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable identifier assigned by a [`Calendar`] when an event is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unit a custom rule measures its interval in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceUnit {
    Day,
    Week,
    Month,
}

/// How an event repeats from its anchor date.
///
/// Every repeating variant carries an optional inclusive `end_date` cutoff.
/// A stored rule this version cannot read (an unknown `type` or `unit`, or a
/// field of the wrong shape such as a negative interval) loads as
/// [`RecurrenceRule::Unrecognized`] holding the original JSON, never occurs,
/// and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    None,
    Daily {
        end_date: Option<NaiveDate>,
    },
    /// Weekday indices, 0 = Sunday through 6 = Saturday.
    Weekly {
        days_of_week: BTreeSet<u8>,
        end_date: Option<NaiveDate>,
    },
    Monthly {
        end_date: Option<NaiveDate>,
    },
    Custom {
        unit: RecurrenceUnit,
        interval: u32,
        end_date: Option<NaiveDate>,
    },
    Unrecognized(serde_json::Value),
}

/// Wire shape of the rules this version understands.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum KnownRule {
    None,
    Daily {
        #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
        end_date: Option<NaiveDate>,
    },
    Weekly {
        #[serde(rename = "daysOfWeek", default)]
        days_of_week: BTreeSet<u8>,
        #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
        end_date: Option<NaiveDate>,
    },
    Monthly {
        #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
        end_date: Option<NaiveDate>,
    },
    Custom {
        unit: RecurrenceUnit,
        interval: u32,
        #[serde(rename = "endDate", default, skip_serializing_if = "Option::is_none")]
        end_date: Option<NaiveDate>,
    },
}

impl From<KnownRule> for RecurrenceRule {
    fn from(rule: KnownRule) -> Self {
        match rule {
            KnownRule::None => RecurrenceRule::None,
            KnownRule::Daily { end_date } => RecurrenceRule::Daily { end_date },
            KnownRule::Weekly {
                days_of_week,
                end_date,
            } => RecurrenceRule::Weekly {
                days_of_week,
                end_date,
            },
            KnownRule::Monthly { end_date } => RecurrenceRule::Monthly { end_date },
            KnownRule::Custom {
                unit,
                interval,
                end_date,
            } => RecurrenceRule::Custom {
                unit,
                interval,
                end_date,
            },
        }
    }
}

impl Serialize for RecurrenceRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let known = match self {
            RecurrenceRule::Unrecognized(raw) => return raw.serialize(serializer),
            RecurrenceRule::None => KnownRule::None,
            RecurrenceRule::Daily { end_date } => KnownRule::Daily {
                end_date: *end_date,
            },
            RecurrenceRule::Weekly {
                days_of_week,
                end_date,
            } => KnownRule::Weekly {
                days_of_week: days_of_week.clone(),
                end_date: *end_date,
            },
            RecurrenceRule::Monthly { end_date } => KnownRule::Monthly {
                end_date: *end_date,
            },
            RecurrenceRule::Custom {
                unit,
                interval,
                end_date,
            } => KnownRule::Custom {
                unit: *unit,
                interval: *interval,
                end_date: *end_date,
            },
        };
        known.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecurrenceRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match KnownRule::deserialize(&raw) {
            Ok(known) => known.into(),
            Err(_) => RecurrenceRule::Unrecognized(raw),
        })
    }
}

impl RecurrenceRule {
    pub fn weekly(days: impl IntoIterator<Item = u8>) -> Self {
        RecurrenceRule::Weekly {
            days_of_week: days.into_iter().collect(),
            end_date: None,
        }
    }

    pub fn custom(unit: RecurrenceUnit, interval: u32) -> Self {
        RecurrenceRule::Custom {
            unit,
            interval,
            end_date: None,
        }
    }

    /// Returns the rule with its cutoff replaced. No-op for `None` and `Unrecognized`.
    pub fn until(mut self, cutoff: NaiveDate) -> Self {
        match &mut self {
            RecurrenceRule::Daily { end_date }
            | RecurrenceRule::Weekly { end_date, .. }
            | RecurrenceRule::Monthly { end_date }
            | RecurrenceRule::Custom { end_date, .. } => *end_date = Some(cutoff),
            RecurrenceRule::None | RecurrenceRule::Unrecognized(_) => {}
        }
        self
    }

    /// Why a [`RecurrenceRule::Unrecognized`] rule could not be read, if it is one.
    pub fn unrecognized_reason(&self) -> Option<String> {
        let RecurrenceRule::Unrecognized(raw) = self else {
            return None;
        };
        Some(match KnownRule::deserialize(raw) {
            Err(err) => format!("unrecognized recurrence rule {}: {}", raw, err),
            Ok(_) => format!("unrecognized recurrence rule {}", raw),
        })
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            RecurrenceRule::Daily { end_date }
            | RecurrenceRule::Weekly { end_date, .. }
            | RecurrenceRule::Monthly { end_date }
            | RecurrenceRule::Custom { end_date, .. } => *end_date,
            RecurrenceRule::None | RecurrenceRule::Unrecognized(_) => None,
        }
    }

    /// Anything other than `none` counts as recurring, including rules this
    /// version cannot evaluate.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, RecurrenceRule::None)
    }

    /// Short human-readable label, e.g. `weekly (Fri) until 2025-12-31`.
    pub fn describe(&self) -> String {
        const NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        let base = match self {
            RecurrenceRule::None => return "once".to_string(),
            RecurrenceRule::Unrecognized(_) => return "unrecognized rule".to_string(),
            RecurrenceRule::Daily { .. } => "daily".to_string(),
            RecurrenceRule::Weekly { days_of_week, .. } => {
                let days: Vec<&str> = days_of_week
                    .iter()
                    .map(|&d| NAMES.get(d as usize).copied().unwrap_or("?"))
                    .collect();
                format!("weekly ({})", days.join(","))
            }
            RecurrenceRule::Monthly { .. } => "monthly".to_string(),
            RecurrenceRule::Custom { unit, interval, .. } => {
                let unit = match unit {
                    RecurrenceUnit::Day => "day",
                    RecurrenceUnit::Week => "week",
                    RecurrenceUnit::Month => "month",
                };
                format!("every {} {}(s)", interval, unit)
            }
        };
        match self.end_date() {
            Some(cutoff) => format!("{} until {}", base, cutoff),
            None => base,
        }
    }
}

/// A committed event as stored in a [`Calendar`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// Anchor date. For recurring events this is the rule's origin.
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl Event {
    pub fn is_recurring(&self) -> bool {
        self.recurrence
            .as_ref()
            .is_some_and(RecurrenceRule::is_recurring)
    }
}

/// The caller's proposed field values for an add or update.
///
/// `date` and `time` are optional so that an incomplete form reaches the
/// guard and is rejected there rather than failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default, deserialize_with = "blank_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm::option")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl EventDraft {
    pub fn new(
        date: NaiveDate,
        time: NaiveTime,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: Some(date),
            time: Some(time),
            title: title.into(),
            description: description.into(),
            recurrence: None,
        }
    }

    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }
}

impl From<&Event> for EventDraft {
    fn from(event: &Event) -> Self {
        Self {
            date: Some(event.date),
            time: Some(event.time),
            title: event.title.clone(),
            description: event.description.clone(),
            recurrence: event.recurrence.clone(),
        }
    }
}

/// Insertion-ordered mapping from [`EventId`] to [`Event`].
///
/// Ids come from a counter owned by the calendar and are never reused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CalendarRecord", into = "CalendarRecord")]
pub struct Calendar {
    events: IndexMap<EventId, Event>,
    next_id: u64,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    pub fn contains(&self, id: EventId) -> bool {
        self.events.contains_key(&id)
    }

    /// Events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    /// The id the next created event will receive.
    pub fn next_id(&self) -> EventId {
        EventId(self.next_id)
    }

    pub(crate) fn insert_new(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        title: String,
        description: String,
        recurrence: Option<RecurrenceRule>,
    ) -> EventId {
        let id = EventId(self.next_id);
        self.next_id += 1;
        self.events.insert(
            id,
            Event {
                id,
                date,
                time,
                title,
                description,
                recurrence,
            },
        );
        id
    }

    /// Mutable access for in-place replacement; keeps the event's position.
    pub(crate) fn get_mut(&mut self, id: EventId) -> Option<&mut Event> {
        self.events.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EventId) -> Option<Event> {
        self.events.shift_remove(&id)
    }
}

impl<'a> IntoIterator for &'a Calendar {
    type Item = &'a Event;
    type IntoIter = indexmap::map::Values<'a, EventId, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.values()
    }
}

/// On-disk shape of a [`Calendar`]: a counter plus an ordered event list.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarRecord {
    next_id: u64,
    events: Vec<Event>,
}

impl TryFrom<CalendarRecord> for Calendar {
    type Error = String;

    fn try_from(record: CalendarRecord) -> Result<Self, Self::Error> {
        let mut events = IndexMap::with_capacity(record.events.len());
        for event in record.events {
            if event.id.0 >= record.next_id {
                return Err(format!(
                    "event id {} is not below nextId {}",
                    event.id, record.next_id
                ));
            }
            let id = event.id;
            if events.insert(id, event).is_some() {
                return Err(format!("duplicate event id {}", id));
            }
        }
        Ok(Calendar {
            events,
            next_id: record.next_id,
        })
    }
}

impl From<Calendar> for CalendarRecord {
    fn from(calendar: Calendar) -> Self {
        CalendarRecord {
            next_id: calendar.next_id,
            events: calendar.events.into_values().collect(),
        }
    }
}

/// Treats an empty or whitespace-only date string as missing.
fn blank_date<'de, D: serde::Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Serde helpers for strict `HH:MM` times.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use super::FORMAT;
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => serializer.collect_str(&t.format(FORMAT)),
                None => serializer.serialize_none(),
            }
        }

        /// Empty strings count as missing so a blank form field reaches validation.
        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => NaiveTime::parse_from_str(raw.trim(), FORMAT)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
            }
        }
    }
}
