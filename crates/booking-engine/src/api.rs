//! Request and response shapes of the accommodation admin REST API, plus the
//! pre-flight conflict check run before a create request is sent.
//!
//! No HTTP client lives here; the host sends the requests. These types only
//! fix the field names and the helper logic around them.

use serde::{Deserialize, Serialize};

use crate::booking::{Booking, BookingStatus, RawBooking};
use crate::conflict::{find_conflicts, ConflictRecord};
use crate::datekey::DayKey;
use crate::error::{BookingError, Result};
use crate::grouping::BookingGroup;

pub const BOOKINGS_PATH: &str = "/accommodation/admin/bookings";
pub const CANCEL_PATH: &str = "/accommodation/admin/bookings/cancel";

/// Query for `GET /accommodation/admin/bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingsQuery {
    pub year: i32,
    pub month: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
}

impl BookingsQuery {
    /// Unencoded `(name, value)` pairs; the HTTP client does the encoding.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("year", self.year.to_string()), ("month", self.month.to_string())];
        if let Some(room_id) = &self.room_id {
            pairs.push(("roomId", room_id.clone()));
        }
        pairs
    }
}

/// Body of a successful bookings fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingsResponse {
    pub bookings: Vec<RawBooking>,
}

/// Body of `POST /accommodation/admin/bookings`: assign a guest or block a
/// room from `check_in_date` through `check_out_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub room_id: String,
    pub check_in_date: DayKey,
    pub check_out_date: DayKey,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Ask the server to cancel whatever is in the way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_block: Option<bool>,
}

impl CreateBookingRequest {
    /// # Errors
    /// Returns `BookingError::InvalidRange` when check-out precedes check-in.
    pub fn validate(&self) -> Result<()> {
        if self.check_in_date > self.check_out_date {
            return Err(BookingError::InvalidRange {
                start: self.check_in_date.to_string(),
                end: self.check_out_date.to_string(),
            });
        }
        Ok(())
    }

    pub fn is_forced(&self) -> bool {
        self.force_block.unwrap_or(false)
    }
}

/// Body of the `409 Conflict` answer to a create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictResponse {
    pub error: String,
    pub can_force_block: bool,
}

impl ConflictResponse {
    pub fn from_conflicts(room_id: &str, conflicts: &[ConflictRecord]) -> Self {
        let days: Vec<String> = conflicts.iter().map(|c| c.date.to_string()).collect();
        Self {
            error: format!("Room {} is already booked on {}", room_id, days.join(", ")),
            can_force_block: true,
        }
    }
}

/// `DELETE /accommodation/admin/bookings?id=...` for one booking night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBooking {
    pub id: String,
}

impl DeleteBooking {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![("id", self.id.clone())]
    }
}

/// Body of `POST /accommodation/admin/bookings/cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CancelRequest {
    ByTravelRequest {
        #[serde(rename = "trfId")]
        trf_id: String,
    },
    ByStaff {
        #[serde(rename = "staffId")]
        staff_id: String,
    },
}

impl CancelRequest {
    /// Bookings this request would cancel, judged from a local snapshot.
    pub fn matches(&self, booking: &Booking) -> bool {
        match self {
            CancelRequest::ByTravelRequest { trf_id } => booking.trf_id.as_ref() == Some(trf_id),
            CancelRequest::ByStaff { staff_id } => booking.staff_id.as_ref() == Some(staff_id),
        }
    }
}

/// Outcome of checking a create request against the local snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "conflicts", rename_all = "camelCase")]
pub enum Preflight {
    /// Nothing in the way.
    Clear,
    /// Occupied days; the operator must force or abort.
    Conflicts(Vec<ConflictRecord>),
    /// Forced request; these bookings will be cancelled by the server.
    Forced(Vec<ConflictRecord>),
}

impl Preflight {
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Preflight::Conflicts(_))
    }
}

/// Run the conflict check for a create request before sending it.
///
/// The range is inclusive of both check-in and check-out days. A clean
/// result does not guarantee the server will accept the write.
///
/// # Errors
/// Returns `BookingError::InvalidRange` when check-out precedes check-in.
pub fn preflight(request: &CreateBookingRequest, bookings: &[Booking]) -> Result<Preflight> {
    request.validate()?;
    let conflicts = find_conflicts(
        &request.room_id,
        request.check_in_date,
        request.check_out_date,
        bookings,
    );
    Ok(match (conflicts.is_empty(), request.is_forced()) {
        (true, _) => Preflight::Clear,
        (false, true) => Preflight::Forced(conflicts),
        (false, false) => Preflight::Conflicts(conflicts),
    })
}

/// One delete request per night of a group, in day order.
pub fn unblock_requests(group: &BookingGroup) -> Vec<DeleteBooking> {
    group
        .booking_ids
        .iter()
        .map(|id| DeleteBooking { id: id.clone() })
        .collect()
}
