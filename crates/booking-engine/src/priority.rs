//! Pick the single booking to paint when several land on one calendar cell.

use crate::booking::{Booking, BookingStatus};

/// Display precedence, most important first.
pub const PRECEDENCE: [BookingStatus; 4] = [
    BookingStatus::Blocked,
    BookingStatus::Confirmed,
    BookingStatus::CheckedIn,
    BookingStatus::CheckedOut,
];

/// Rank of a status in [`PRECEDENCE`]; statuses outside it rank last.
pub fn precedence(status: &BookingStatus) -> usize {
    PRECEDENCE
        .iter()
        .position(|s| s == status)
        .unwrap_or(PRECEDENCE.len())
}

/// Return the highest-precedence booking among those sharing a cell.
///
/// Ties go to the booking encountered first. Returns `None` only for an empty
/// input; unknown statuses never cause a failure, they simply lose.
pub fn resolve<'a, I>(bookings: I) -> Option<&'a Booking>
where
    I: IntoIterator<Item = &'a Booking>,
{
    bookings.into_iter().min_by_key(|b| precedence(&b.status))
}
