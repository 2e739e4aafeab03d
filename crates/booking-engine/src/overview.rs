//! Monthly room × day grid for the overview calendar.

use std::collections::{BTreeSet, HashMap};

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::booking::Booking;
use crate::datekey::{day_range, DayKey};
use crate::error::{BookingError, Result};
use crate::priority;

/// One room's row: a cell per day of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRow {
    pub room_id: String,
    /// Parallel to [`MonthOverview::days`]. `None` is a free cell.
    pub cells: Vec<Option<Booking>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthOverview {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayKey>,
    pub rooms: Vec<RoomRow>,
}

/// Build the grid for every room that appears in `bookings`.
///
/// # Errors
/// Returns `BookingError::InvalidMonth` if `month` is not 1..=12 or the year
/// is out of range.
pub fn month_overview(year: i32, month: u32, bookings: &[Booking]) -> Result<MonthOverview> {
    let rooms: BTreeSet<&str> = bookings.iter().map(|b| b.room_id.as_str()).collect();
    let rooms: Vec<&str> = rooms.into_iter().collect();
    month_overview_for_rooms(year, month, &rooms, bookings)
}

/// Build the grid for an explicit room list, in the order given.
///
/// Rooms without bookings get an all-free row. Each cell shows the booking
/// [`priority::resolve`] picks among the non-cancelled bookings for that room
/// and day.
///
/// # Errors
/// Returns `BookingError::InvalidMonth` if `month` is not 1..=12 or the year
/// is out of range.
pub fn month_overview_for_rooms(
    year: i32,
    month: u32,
    rooms: &[&str],
    bookings: &[Booking],
) -> Result<MonthOverview> {
    let (first, last) =
        month_bounds(year, month).ok_or(BookingError::InvalidMonth { year, month })?;
    let days: Vec<DayKey> = day_range(first, last).collect();

    let mut cells: HashMap<(&str, DayKey), Vec<&Booking>> = HashMap::new();
    for booking in bookings.iter().filter(|b| !b.status.is_cancelled()) {
        if let Some(day) = booking.date.filter(|d| (first..=last).contains(d)) {
            cells
                .entry((booking.room_id.as_str(), day))
                .or_default()
                .push(booking);
        }
    }

    let rooms = rooms
        .iter()
        .map(|room_id| RoomRow {
            room_id: room_id.to_string(),
            cells: days
                .iter()
                .map(|day| {
                    cells
                        .get(&(*room_id, *day))
                        .and_then(|on_cell| priority::resolve(on_cell.iter().copied()))
                        .cloned()
                })
                .collect(),
        })
        .collect();

    Ok(MonthOverview {
        year,
        month,
        days,
        rooms,
    })
}

fn month_bounds(year: i32, month: u32) -> Option<(DayKey, DayKey)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((DayKey::new(first), DayKey::new(last)))
}
