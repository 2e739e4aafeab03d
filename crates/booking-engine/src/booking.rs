//! Booking records: the wire shape, the normalized shape, and booking status.
//!
//! Storage keeps one booking per room-night. A booking is either a guest stay
//! (with a guest name and usually a gender) or a maintenance block (no guest,
//! often a reason in `notes`). This crate only reads bookings; creating,
//! cancelling and checking guests in or out happens through the REST API.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::datekey::{DateNormalizer, DayKey};
use crate::error::{BookingError, Result};

/// Status of a single booking night.
///
/// Unknown values from the API are kept verbatim in [`BookingStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Blocked,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Blocked => "Blocked",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::CheckedIn => "Checked-in",
            BookingStatus::CheckedOut => "Checked-out",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Other(s) => s,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self == BookingStatus::Cancelled
    }

    pub fn is_blocked(&self) -> bool {
        *self == BookingStatus::Blocked
    }

    /// Whether an admin action may move a booking from `self` to `next`.
    ///
    /// `Confirmed -> Checked-in -> Checked-out`, and `Confirmed | Blocked ->
    /// Cancelled`. `Cancelled` is terminal; blocks are never checked in.
    pub fn can_transition_to(&self, next: &BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Confirmed, BookingStatus::CheckedIn)
                | (BookingStatus::CheckedIn, BookingStatus::CheckedOut)
                | (
                    BookingStatus::Confirmed | BookingStatus::Blocked,
                    BookingStatus::Cancelled
                )
        )
    }

    /// # Errors
    /// Returns `BookingError::InvalidTransition` when
    /// [`can_transition_to`](Self::can_transition_to) is false.
    pub fn transition(&self, next: BookingStatus) -> Result<BookingStatus> {
        if self.can_transition_to(&next) {
            Ok(next)
        } else {
            Err(BookingError::InvalidTransition {
                from: self.clone(),
                to: next,
            })
        }
    }
}

impl From<&str> for BookingStatus {
    /// Case- and separator-insensitive: `Checked-in`, `checked_in` and
    /// `CHECKED IN` all parse to [`BookingStatus::CheckedIn`].
    fn from(s: &str) -> Self {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match key.as_str() {
            "blocked" => BookingStatus::Blocked,
            "confirmed" => BookingStatus::Confirmed,
            "checked-in" | "checkedin" => BookingStatus::CheckedIn,
            "checked-out" | "checkedout" => BookingStatus::CheckedOut,
            "cancelled" | "canceled" => BookingStatus::Cancelled,
            _ => BookingStatus::Other(s.trim().to_string()),
        }
    }
}

impl From<String> for BookingStatus {
    fn from(s: String) -> Self {
        BookingStatus::from(s.as_str())
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded gender of a guest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    /// Any other recorded value, lowercased.
    Other(String),
}

impl Gender {
    /// Read a recorded or requested gender; blank input means unknown.
    pub fn parse(s: &str) -> Option<Gender> {
        if s.trim().is_empty() {
            None
        } else {
            Some(Gender::from(s))
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other(s) => s,
        }
    }
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        let key = s.trim().to_ascii_lowercase();
        match key.as_str() {
            "male" | "m" => Gender::Male,
            "female" | "f" => Gender::Female,
            _ => Gender::Other(key),
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        Gender::from(s.as_str())
    }
}

impl From<Gender> for String {
    fn from(g: Gender) -> Self {
        match g {
            Gender::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifiers arrive as JSON strings or numbers depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Int(i64),
}

impl From<IdRepr> for String {
    fn from(id: IdRepr) -> Self {
        match id {
            IdRepr::Text(s) => s,
            IdRepr::Int(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    IdRepr::deserialize(d).map(String::from)
}

fn opt_id_string<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<String>, D::Error> {
    Option::<IdRepr>::deserialize(d).map(|id| id.map(String::from))
}

/// A booking as returned by `GET /accommodation/admin/bookings`.
///
/// The day field has been sent as `date`, as `bookingDate`, or as both; as a
/// bare date, a full timestamp, or epoch milliseconds. Both stay raw JSON
/// until [`RawBooking::normalize`], so one odd row cannot sink the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBooking {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub room_id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub staff_house_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_date: Option<Value>,
    pub status: BookingStatus,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub trf_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub staff_id: Option<String>,
}

impl RawBooking {
    /// Normalize the day field once, at the ingestion edge.
    ///
    /// `date` wins over `bookingDate` when both are present. Numbers are read
    /// as epoch milliseconds. An unparseable, missing or oddly typed date
    /// becomes `None` and is logged; such a booking never occupies a day.
    /// Blank genders are dropped.
    pub fn normalize(self, normalizer: &DateNormalizer) -> Booking {
        let date = match self.date.as_ref().or(self.booking_date.as_ref()) {
            Some(Value::String(raw)) => normalizer.normalize(raw.as_str()),
            Some(Value::Number(n)) => match n
                .as_i64()
                .and_then(DateTime::<Utc>::from_timestamp_millis)
            {
                Some(instant) => normalizer.normalize(instant),
                None => {
                    warn!(booking_id = %self.id, value = %n, "epoch date out of range");
                    None
                }
            },
            Some(other) => {
                warn!(
                    booking_id = %self.id,
                    value = %other,
                    "booking date is not a string or number"
                );
                None
            }
            None => {
                warn!(booking_id = %self.id, room_id = %self.room_id, "booking has no date");
                None
            }
        };
        let gender = self.gender.as_deref().and_then(Gender::parse);

        Booking {
            id: self.id,
            room_id: self.room_id,
            staff_house_id: self.staff_house_id,
            date,
            status: self.status,
            guest_name: self.guest_name,
            gender,
            notes: self.notes,
            trf_id: self.trf_id,
            staff_id: self.staff_id,
        }
    }
}

/// One room-night (or blocked night) with its day already normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_house_id: Option<String>,
    /// `None` when the source date could not be read.
    pub date: Option<DayKey>,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trf_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<String>,
}

impl Booking {
    pub fn new(
        id: impl Into<String>,
        room_id: impl Into<String>,
        date: DayKey,
        status: BookingStatus,
    ) -> Self {
        Self {
            id: id.into(),
            room_id: room_id.into(),
            staff_house_id: None,
            date: Some(date),
            status,
            guest_name: None,
            gender: None,
            notes: None,
            trf_id: None,
            staff_id: None,
        }
    }

    pub fn with_guest(mut self, name: impl Into<String>, gender: Option<Gender>) -> Self {
        self.guest_name = Some(name.into());
        self.gender = gender;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// True when this booking holds `room_id` on `day`.
    ///
    /// Cancelled bookings and bookings without a readable date hold nothing.
    pub fn occupies(&self, room_id: &str, day: DayKey) -> bool {
        self.room_id == room_id && self.date == Some(day) && !self.status.is_cancelled()
    }
}

#[derive(Deserialize)]
struct Envelope {
    bookings: Vec<RawBooking>,
}

/// Parse a bookings payload and normalize every booking's date.
///
/// Accepts the API envelope `{ "bookings": [...] }` or a bare array. The
/// shape is picked from the first token so serde's error points at the row
/// and field that failed.
///
/// # Errors
/// Returns `BookingError::Json` when the payload is not valid JSON or a row
/// lacks a required field. Bad dates inside a valid payload are not errors.
pub fn parse_bookings_json(json: &str, normalizer: &DateNormalizer) -> Result<Vec<Booking>> {
    let raw = if json.trim_start().starts_with('[') {
        serde_json::from_str::<Vec<RawBooking>>(json)?
    } else {
        serde_json::from_str::<Envelope>(json)?.bookings
    };
    Ok(raw.into_iter().map(|b| b.normalize(normalizer)).collect())
}
