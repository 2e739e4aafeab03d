//! Advisory check against placing guests of different recorded gender in the
//! same room on the same night.
//!
//! The result only informs the room selector; operators may override it.

use crate::booking::{Booking, Gender};
use crate::datekey::{day_range, DayKey};

/// True when a guest of `candidate` gender would share `room_id` on `date`
/// with a guest whose recorded gender differs.
///
/// Cancelled bookings and blocks are ignored. Guests with no recorded gender
/// never conflict, and neither does a candidate whose gender is unknown.
pub fn has_gender_conflict(
    room_id: &str,
    candidate: Option<&Gender>,
    date: DayKey,
    bookings: &[Booking],
) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    bookings
        .iter()
        .filter(|b| b.occupies(room_id, date) && !b.status.is_blocked())
        .filter_map(|b| b.gender.as_ref())
        .any(|g| g != candidate)
}

/// Days in `start..=end` on which [`has_gender_conflict`] holds.
pub fn gender_conflict_days(
    room_id: &str,
    candidate: Option<&Gender>,
    start: DayKey,
    end: DayKey,
    bookings: &[Booking],
) -> Vec<DayKey> {
    day_range(start, end)
        .filter(|day| has_gender_conflict(room_id, candidate, *day, bookings))
        .collect()
}
