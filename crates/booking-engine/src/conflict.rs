//! Find already-occupied days within a candidate assignment or block range.
//!
//! This is a pre-flight check. Two operators can still commit the same room
//! and day between the check and the write; only the API's `409 Conflict`
//! settles that.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::booking::{Booking, BookingStatus};
use crate::datekey::{day_range, DayKey};
use crate::priority;

/// One occupied day inside a candidate range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    pub date: DayKey,
    pub status: BookingStatus,
    pub guest_name: Option<String>,
    /// The occupying booking. When several occupy the day, the one that
    /// [`priority::resolve`] would paint.
    pub booking: Booking,
}

/// Report every day in `start..=end` on which `room_id` is already held.
///
/// Cancelled bookings and bookings with an unreadable date never conflict.
/// Returns one record per conflicting day in ascending date order, and an
/// empty list for an empty range (`start > end`) or empty input.
pub fn find_conflicts(
    room_id: &str,
    start: DayKey,
    end: DayKey,
    bookings: &[Booking],
) -> Vec<ConflictRecord> {
    let held: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.room_id == room_id && b.date.is_some() && !b.status.is_cancelled())
        .collect();

    if held.is_empty() {
        return Vec::new();
    }

    let conflicts: Vec<ConflictRecord> = day_range(start, end)
        .filter_map(|day| {
            let on_day = held.iter().copied().filter(|b| b.date == Some(day));
            priority::resolve(on_day).map(|booking| ConflictRecord {
                date: day,
                status: booking.status.clone(),
                guest_name: booking.guest_name.clone(),
                booking: booking.clone(),
            })
        })
        .collect();

    debug!(
        room_id,
        %start,
        %end,
        conflicts = conflicts.len(),
        "checked room range for conflicts"
    );
    conflicts
}
