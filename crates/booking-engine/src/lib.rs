//! # booking-engine
//!
//! Pure decision helpers for the staff-house accommodation admin console.
//!
//! Every function here takes an explicit snapshot of bookings that the host
//! has already fetched and returns a new derived value. Nothing performs I/O
//! and nothing mutates its input. The conflict checks are pre-flight only: the
//! accommodation API remains the source of truth and answers `409 Conflict`
//! when a write races another operator.
//!
//! ## Modules
//!
//! - [`datekey`] — Normalize heterogeneous date values into calendar-day keys
//! - [`booking`] — Booking record, status state machine, wire ingestion
//! - [`conflict`] — Occupied days within a candidate assignment/block range
//! - [`gender`] — Advisory mixed-gender room checks
//! - [`grouping`] — Merge consecutive per-day bookings into ranges
//! - [`priority`] — Pick the booking to paint on a calendar cell
//! - [`overview`] — Monthly room × day grid
//! - [`api`] — Request/response shapes of the accommodation REST API
//! - [`error`] — Error types

pub mod api;
pub mod booking;
pub mod conflict;
pub mod datekey;
pub mod error;
pub mod gender;
pub mod grouping;
pub mod overview;
pub mod priority;

pub use booking::{parse_bookings_json, Booking, BookingStatus, Gender, RawBooking};
pub use conflict::{find_conflicts, ConflictRecord};
pub use datekey::{day_range, DateLike, DateNormalizer, DayKey};
pub use error::BookingError;
pub use gender::{gender_conflict_days, has_gender_conflict};
pub use grouping::{current_blocks, group, BookingGroup};
pub use overview::{month_overview, month_overview_for_rooms, MonthOverview, RoomRow};
pub use priority::resolve;
