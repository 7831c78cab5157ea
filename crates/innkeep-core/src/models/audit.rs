//! Audit log domain model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Well-known audit actions. Stored as plain strings so the log can
/// also carry actions this enum does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    UserCreated,
    UserUpdated,
    UserDeleted,
    RoomCreated,
    RoomUpdated,
    RoomDeleted,
    BookingCreated,
    BookingUpdated,
    BookingCancelled,
    BookingCheckedIn,
    BookingCheckedOut,
    UserSignedIn,
    UserSignedOut,
    DataExported,
    DataImported,
    DataReset,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::UserCreated => "user_created",
            AuditAction::UserUpdated => "user_updated",
            AuditAction::UserDeleted => "user_deleted",
            AuditAction::RoomCreated => "room_created",
            AuditAction::RoomUpdated => "room_updated",
            AuditAction::RoomDeleted => "room_deleted",
            AuditAction::BookingCreated => "booking_created",
            AuditAction::BookingUpdated => "booking_updated",
            AuditAction::BookingCancelled => "booking_cancelled",
            AuditAction::BookingCheckedIn => "booking_checked_in",
            AuditAction::BookingCheckedOut => "booking_checked_out",
            AuditAction::UserSignedIn => "user_signed_in",
            AuditAction::UserSignedOut => "user_signed_out",
            AuditAction::DataExported => "data_exported",
            AuditAction::DataImported => "data_imported",
            AuditAction::DataReset => "data_reset",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditLogEntry {
    pub user_id: Uuid,
    pub user_name: String,
    pub action: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub details: Option<String>,
}
