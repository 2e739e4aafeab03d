//! WASM bindings for booking-engine.
//!
//! Exposes date normalization, conflict detection, gender checks, range
//! grouping, cell priority and the monthly grid to the accommodation admin
//! page via `wasm-bindgen`. Bookings cross the boundary as the JSON the REST
//! API returns (`{"bookings": [...]}` or a bare array); results go back as
//! JSON strings. Every call takes the deployment timezone name so offset
//! timestamps land on the right calendar day.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p booking-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/booking-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/booking_engine_wasm.wasm
//! ```

use booking_engine::{Booking, DateNormalizer, DayKey, Gender};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers for crossing the boundary
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn normalizer(timezone: &str) -> Result<DateNormalizer, JsValue> {
    DateNormalizer::from_timezone(timezone).map_err(js_err)
}

fn parse_bookings(json: &str, normalizer: &DateNormalizer) -> Result<Vec<Booking>, JsValue> {
    booking_engine::parse_bookings_json(json, normalizer)
        .map_err(|e| JsValue::from_str(&format!("Invalid bookings JSON: {}", e)))
}

fn parse_day(normalizer: &DateNormalizer, value: &str) -> Result<DayKey, JsValue> {
    normalizer.try_normalize(value).map_err(js_err)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Normalize a date string to its `YYYY-MM-DD` calendar day.
///
/// Returns `undefined` when the input cannot be read, mirroring the engine's
/// "unreadable dates never match" rule.
#[wasm_bindgen(js_name = "normalizeDate")]
pub fn normalize_date(value: &str, timezone: &str) -> Result<Option<String>, JsValue> {
    let n = normalizer(timezone)?;
    Ok(n.normalize(value).map(|day| day.to_string()))
}

/// Occupied days in `room_id` from `start` through `end` (inclusive).
///
/// Returns a JSON array of `{date, status, guestName, booking}` objects in
/// ascending date order.
#[wasm_bindgen(js_name = "findConflicts")]
pub fn find_conflicts(
    room_id: &str,
    start: &str,
    end: &str,
    bookings_json: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    let n = normalizer(timezone)?;
    let bookings = parse_bookings(bookings_json, &n)?;
    let start = parse_day(&n, start)?;
    let end = parse_day(&n, end)?;

    to_json(&booking_engine::find_conflicts(room_id, start, end, &bookings))
}

/// Whether a guest of `gender` would share `room_id` on `date` with a guest
/// of a different recorded gender. Advisory only; a blank `gender` never
/// conflicts.
#[wasm_bindgen(js_name = "hasGenderConflict")]
pub fn has_gender_conflict(
    room_id: &str,
    gender: &str,
    date: &str,
    bookings_json: &str,
    timezone: &str,
) -> Result<bool, JsValue> {
    let n = normalizer(timezone)?;
    let bookings = parse_bookings(bookings_json, &n)?;
    let day = parse_day(&n, date)?;

    Ok(booking_engine::has_gender_conflict(
        room_id,
        Gender::parse(gender).as_ref(),
        day,
        &bookings,
    ))
}

/// Merge consecutive-day bookings into ranges.
///
/// With `blocks_only`, only `Blocked` bookings are grouped. Returns a JSON
/// array of `{roomId, startDate, endDate, bookingIds, representativeBooking,
/// isRange}` objects.
#[wasm_bindgen(js_name = "groupBookings")]
pub fn group_bookings(
    bookings_json: &str,
    blocks_only: bool,
    timezone: &str,
) -> Result<String, JsValue> {
    let n = normalizer(timezone)?;
    let bookings = parse_bookings(bookings_json, &n)?;

    let groups = if blocks_only {
        booking_engine::current_blocks(&bookings)
    } else {
        booking_engine::group(&bookings)
    };
    to_json(&groups)
}

/// Pick the booking to paint for one calendar cell.
///
/// `bookings_json` holds the bookings already known to share the cell.
/// Returns the chosen booking as JSON, or `"null"` for an empty cell.
#[wasm_bindgen(js_name = "resolveBooking")]
pub fn resolve_booking(bookings_json: &str, timezone: &str) -> Result<String, JsValue> {
    let n = normalizer(timezone)?;
    let bookings = parse_bookings(bookings_json, &n)?;

    to_json(&booking_engine::resolve(&bookings))
}

/// Build the monthly room × day grid.
///
/// `rooms_json` is an optional JSON array of room ids in display order; when
/// omitted, every room present in the bookings gets a row.
#[wasm_bindgen(js_name = "monthOverview")]
pub fn month_overview(
    year: i32,
    month: u32,
    bookings_json: &str,
    rooms_json: Option<String>,
    timezone: &str,
) -> Result<String, JsValue> {
    let n = normalizer(timezone)?;
    let bookings = parse_bookings(bookings_json, &n)?;

    let grid = match rooms_json {
        Some(rooms_json) => {
            let rooms: Vec<String> = serde_json::from_str(&rooms_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid rooms JSON: {}", e)))?;
            let rooms: Vec<&str> = rooms.iter().map(String::as_str).collect();
            booking_engine::month_overview_for_rooms(year, month, &rooms, &bookings)
        }
        None => booking_engine::month_overview(year, month, &bookings),
    }
    .map_err(js_err)?;

    to_json(&grid)
}
