//! WASM bindings for calendar-engine.
//!
//! Exposes occurrence queries and the guarded mutations to JavaScript via
//! `wasm-bindgen`. The calendar, drafts, and results cross the boundary as
//! JSON strings in the same shape the engine persists.
//!
//! Rejections are ordinary results, not exceptions:
//!
//! ```json
//! {"ok":false,"rejection":{"kind":"duplicateTime","date":"2025-07-04","time":"10:15","conflicting":0}}
//! ```
//!
//! Only malformed input (unparseable JSON or dates) raises a JS error.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p calendar-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/calendar-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/calendar_engine_wasm.wasm
//! ```

use calendar_engine::{Calendar, Event, EventDraft, EventId, Rejection};
use chrono::NaiveDate;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Result DTO for guarded mutations
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct MutationDto<'a> {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    calendar: Option<&'a Calendar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<EventId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<&'a Rejection>,
}

impl<'a> MutationDto<'a> {
    fn accepted(calendar: &'a Calendar, id: Option<EventId>) -> Self {
        Self {
            ok: true,
            calendar: Some(calendar),
            id,
            rejection: None,
        }
    }

    fn rejected(rejection: &'a Rejection) -> Self {
        Self {
            ok: false,
            calendar: None,
            id: None,
            rejection: Some(rejection),
        }
    }
}

// ---------------------------------------------------------------------------
// Plain-Rust layer (testable off-wasm)
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    s.trim()
        .parse::<NaiveDate>()
        .map_err(|e| format!("Invalid date '{}': {}", s, e))
}

fn parse_calendar(json: &str) -> Result<Calendar, String> {
    if json.trim().is_empty() {
        return Ok(Calendar::new());
    }
    serde_json::from_str(json).map_err(|e| format!("Invalid calendar JSON: {}", e))
}

fn parse_draft(json: &str) -> Result<EventDraft, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid event JSON: {}", e))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn mutation_json(
    outcome: Result<(Calendar, Option<EventId>), Rejection>,
) -> Result<String, String> {
    match &outcome {
        Ok((calendar, id)) => to_json(&MutationDto::accepted(calendar, *id)),
        Err(rejection) => to_json(&MutationDto::rejected(rejection)),
    }
}

fn occurs_on_impl(event_json: &str, date: &str) -> Result<bool, String> {
    let event: Event =
        serde_json::from_str(event_json).map_err(|e| format!("Invalid event JSON: {}", e))?;
    Ok(calendar_engine::occurs_on(&event, parse_date(date)?))
}

fn expand_occurrences_impl(calendar_json: &str, date: &str) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    let events = calendar_engine::expand_occurrences(&calendar, parse_date(date)?);
    to_json(&events)
}

fn apply_add_impl(calendar_json: &str, draft_json: &str) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    let draft = parse_draft(draft_json)?;
    mutation_json(calendar_engine::apply_add(&calendar, draft).map(|(c, id)| (c, Some(id))))
}

fn apply_update_impl(calendar_json: &str, id: u32, draft_json: &str) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    let draft = parse_draft(draft_json)?;
    mutation_json(
        calendar_engine::apply_update(&calendar, EventId(u64::from(id)), draft).map(|c| (c, None)),
    )
}

fn apply_move_impl(calendar_json: &str, id: u32, new_date: &str) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    let new_date = parse_date(new_date)?;
    mutation_json(
        calendar_engine::apply_move(&calendar, EventId(u64::from(id)), new_date).map(|c| (c, None)),
    )
}

fn apply_delete_impl(calendar_json: &str, id: u32) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    to_json(&calendar_engine::apply_delete(&calendar, EventId(u64::from(id))))
}

fn month_view_impl(calendar_json: &str, year: i32, month: u32) -> Result<String, String> {
    let calendar = parse_calendar(calendar_json)?;
    let view = calendar_engine::month_view(&calendar, year, month)
        .ok_or_else(|| format!("Invalid month: {}-{:02}", year, month))?;
    to_json(&view)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

/// Whether a single event (JSON) occurs on `date` (`YYYY-MM-DD`).
#[wasm_bindgen(js_name = "occursOn")]
pub fn occurs_on(event_json: &str, date: &str) -> Result<bool, JsValue> {
    occurs_on_impl(event_json, date).map_err(js_err)
}

/// Events of the calendar occurring on `date`, as a JSON array ordered by time.
#[wasm_bindgen(js_name = "expandOccurrences")]
pub fn expand_occurrences(calendar_json: &str, date: &str) -> Result<String, JsValue> {
    expand_occurrences_impl(calendar_json, date).map_err(js_err)
}

/// Add an event from a draft `{date, time, title, description, recurrence?}`.
///
/// An empty `calendar_json` is treated as an empty calendar.
#[wasm_bindgen(js_name = "applyAdd")]
pub fn apply_add(calendar_json: &str, draft_json: &str) -> Result<String, JsValue> {
    apply_add_impl(calendar_json, draft_json).map_err(js_err)
}

/// Replace the fields of event `id` with a draft.
#[wasm_bindgen(js_name = "applyUpdate")]
pub fn apply_update(calendar_json: &str, id: u32, draft_json: &str) -> Result<String, JsValue> {
    apply_update_impl(calendar_json, id, draft_json).map_err(js_err)
}

/// Move one-off event `id` to `new_date`, e.g. after a drag-and-drop.
#[wasm_bindgen(js_name = "applyMove")]
pub fn apply_move(calendar_json: &str, id: u32, new_date: &str) -> Result<String, JsValue> {
    apply_move_impl(calendar_json, id, new_date).map_err(js_err)
}

/// Remove event `id`. Returns the new calendar JSON.
#[wasm_bindgen(js_name = "applyDelete")]
pub fn apply_delete(calendar_json: &str, id: u32) -> Result<String, JsValue> {
    apply_delete_impl(calendar_json, id).map_err(js_err)
}

/// The Sunday-first month grid with each day's occurrences.
#[wasm_bindgen(js_name = "monthView")]
pub fn month_view(calendar_json: &str, year: i32, month: u32) -> Result<String, JsValue> {
    month_view_impl(calendar_json, year, month).map_err(js_err)
}
