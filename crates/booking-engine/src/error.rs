//! Error types for booking-engine operations.

use thiserror::Error;

use crate::booking::BookingStatus;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid date: {0:?}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid range: {start} is after {end}")]
    InvalidRange { start: String, end: String },

    #[error("Invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Booking cannot move from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BookingError>;
