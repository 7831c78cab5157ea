//! Booking domain model.
//!
//! A booking covers the half-open interval `[check_in, check_out)`:
//! the check-out instant is exclusive, so back-to-back bookings that
//! share a boundary do not conflict.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BookingStatus {
    Reserved,
    #[serde(rename = "Checked-in")]
    CheckedIn,
    #[serde(rename = "Checked-out")]
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    /// Active bookings count toward conflicts and occupancy.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Reserved | BookingStatus::CheckedIn)
    }

    /// Terminal states admit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Reserved => "Reserved",
            BookingStatus::CheckedIn => "Checked-in",
            BookingStatus::CheckedOut => "Checked-out",
            BookingStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Paid => "Paid",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub guest_name: String,
    pub guest_contact: String,
    pub room_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// Derived: nights x the room's nightly price at creation/update time.
    pub total_cost: f64,
    pub paid_amount: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Repository-level create input. The lifecycle service validates the
/// dates, checks conflicts, and computes `total_cost` before building one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub guest_name: String,
    pub guest_contact: String,
    pub room_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub total_cost: f64,
    pub paid_amount: f64,
    pub notes: Option<String>,
}

/// Repository-level partial update. Status and total cost are set here
/// by the lifecycle service only; callers go through the transition
/// operations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateBooking {
    pub guest_name: Option<String>,
    pub guest_contact: Option<String>,
    pub room_id: Option<Uuid>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub total_cost: Option<f64>,
    pub paid_amount: Option<f64>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub notes: Option<Option<String>>,
}

/// Filters for booking list queries. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub room_id: Option<Uuid>,
    /// Keep bookings whose check-in is at or after this instant.
    pub start: Option<DateTime<Utc>>,
    /// Keep bookings whose check-out is at or before this instant.
    pub end: Option<DateTime<Utc>>,
    /// Case-insensitive substring match on guest name or contact.
    pub search: Option<String>,
}
