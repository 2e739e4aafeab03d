//! Merge per-day bookings into runs of consecutive days.
//!
//! Bookings are stored one per night, but the admin console shows and unblocks
//! them as ranges. A run continues only while each booking falls on the
//! calendar day right after the previous one; the step is a calendar-day
//! successor, never a fixed number of milliseconds, so DST shifts cannot split
//! or join runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::booking::Booking;
use crate::datekey::{day_range, DayKey};

/// A run of consecutive-day bookings in one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingGroup {
    pub room_id: String,
    pub start_date: DayKey,
    pub end_date: DayKey,
    /// Ids in day order; one per day from `start_date` to `end_date`.
    pub booking_ids: Vec<String>,
    /// The first booking of the run.
    pub representative_booking: Booking,
    /// True iff the run spans more than one day.
    pub is_range: bool,
}

impl BookingGroup {
    fn single(day: DayKey, booking: &Booking) -> Self {
        Self {
            room_id: booking.room_id.clone(),
            start_date: day,
            end_date: day,
            booking_ids: vec![booking.id.clone()],
            representative_booking: booking.clone(),
            is_range: false,
        }
    }

    fn extends_to(&self, room_id: &str, day: DayKey) -> bool {
        self.room_id == room_id && self.end_date.succ() == Some(day)
    }

    fn push(&mut self, day: DayKey, booking: &Booking) {
        self.end_date = day;
        self.booking_ids.push(booking.id.clone());
        self.is_range = true;
    }

    pub fn night_count(&self) -> usize {
        self.booking_ids.len()
    }

    pub fn days(&self) -> impl Iterator<Item = DayKey> {
        day_range(self.start_date, self.end_date)
    }
}

/// Partition bookings by room and merge consecutive days into groups.
///
/// Rooms are emitted in ascending room-id order, and each room's groups in
/// chronological order. Two bookings for the same room and day cannot share a
/// group (their gap is zero days, not one), so the second starts its own.
/// Bookings without a readable date are logged and left out.
pub fn group<'a, I>(bookings: I) -> Vec<BookingGroup>
where
    I: IntoIterator<Item = &'a Booking>,
{
    let mut by_room: BTreeMap<&str, Vec<(DayKey, &Booking)>> = BTreeMap::new();
    for booking in bookings {
        match booking.date {
            Some(day) => by_room
                .entry(booking.room_id.as_str())
                .or_default()
                .push((day, booking)),
            None => warn!(
                booking_id = %booking.id,
                room_id = %booking.room_id,
                "booking without a readable date left out of grouping"
            ),
        }
    }

    let mut groups: Vec<BookingGroup> = Vec::new();
    for (room_id, mut nights) in by_room {
        // Stable: same-day duplicates keep their input order.
        nights.sort_by_key(|(day, _)| *day);

        for (day, booking) in nights {
            match groups.last_mut() {
                Some(last) if last.extends_to(room_id, day) => last.push(day, booking),
                _ => groups.push(BookingGroup::single(day, booking)),
            }
        }
    }

    debug!(groups = groups.len(), "grouped bookings into ranges");
    groups
}

/// Group only the `Blocked` bookings: the "current blocks" an operator can
/// lift one range at a time.
pub fn current_blocks(bookings: &[Booking]) -> Vec<BookingGroup> {
    group(bookings.iter().filter(|b| b.status.is_blocked()))
}
