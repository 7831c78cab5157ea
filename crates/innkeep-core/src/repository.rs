//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations are expected to
//! return [`InnkeepError::NotFound`] for unknown ids rather than an
//! empty result.
//!
//! [`InnkeepError::NotFound`]: crate::error::InnkeepError::NotFound

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::InnkeepResult;
use crate::models::{
    audit::{AuditLogEntry, CreateAuditLogEntry},
    booking::{Booking, NewBooking, UpdateBooking},
    room::{CreateRoom, Room, RoomStatus, UpdateRoom},
    session::{CreateSession, Session},
    settings::{Settings, UpdateSettings},
    user::{CreateUser, UpdateUser, User},
};

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

pub trait RoomRepository: Send + Sync {
    fn create(&self, input: CreateRoom) -> impl Future<Output = InnkeepResult<Room>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InnkeepResult<Room>> + Send;
    fn get_by_number(
        &self,
        room_number: &str,
    ) -> impl Future<Output = InnkeepResult<Room>> + Send;
    /// All rooms, ordered by room number.
    fn list(&self) -> impl Future<Output = InnkeepResult<Vec<Room>>> + Send;
    fn list_by_status(
        &self,
        status: RoomStatus,
    ) -> impl Future<Output = InnkeepResult<Vec<Room>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateRoom,
    ) -> impl Future<Output = InnkeepResult<Room>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InnkeepResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

pub trait BookingRepository: Send + Sync {
    fn create(&self, input: NewBooking) -> impl Future<Output = InnkeepResult<Booking>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InnkeepResult<Booking>> + Send;
    /// All bookings, newest check-in first.
    fn list(&self) -> impl Future<Output = InnkeepResult<Vec<Booking>>> + Send;
    fn list_by_room(
        &self,
        room_id: Uuid,
    ) -> impl Future<Output = InnkeepResult<Vec<Booking>>> + Send;
    /// Bookings whose check-in falls inside `[start, end)`.
    fn list_checking_in_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = InnkeepResult<Vec<Booking>>> + Send;
    /// Bookings whose check-out falls inside `[start, end)`.
    fn list_checking_out_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = InnkeepResult<Vec<Booking>>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateBooking,
    ) -> impl Future<Output = InnkeepResult<Booking>> + Send;
    /// Hard delete. Reserved for reset/import paths — the lifecycle
    /// service cancels instead of deleting.
    fn delete(&self, id: Uuid) -> impl Future<Output = InnkeepResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Hashes the raw password before storage. Rejects duplicate emails.
    fn create(&self, input: CreateUser) -> impl Future<Output = InnkeepResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = InnkeepResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = InnkeepResult<User>> + Send;
    fn list(&self) -> impl Future<Output = InnkeepResult<Vec<User>>> + Send;
    fn count(&self) -> impl Future<Output = InnkeepResult<u64>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = InnkeepResult<User>> + Send;
    /// Rejects deleting the last remaining admin.
    fn delete(&self, id: Uuid) -> impl Future<Output = InnkeepResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = InnkeepResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = InnkeepResult<Session>> + Send;
    /// Most recently created session, if any.
    fn latest(&self) -> impl Future<Output = InnkeepResult<Option<Session>>> + Send;
    fn get_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = InnkeepResult<Vec<Session>>> + Send;
    fn set_expiry(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> impl Future<Output = InnkeepResult<()>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = InnkeepResult<()>> + Send;
    /// Remove every session belonging to a user.
    fn delete_for_user(&self, user_id: Uuid) -> impl Future<Output = InnkeepResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Audit log (append-only)
// ---------------------------------------------------------------------------

pub trait AuditLogRepository: Send + Sync {
    /// Append a new entry. No update operation exists.
    fn append(
        &self,
        input: CreateAuditLogEntry,
    ) -> impl Future<Output = InnkeepResult<AuditLogEntry>> + Send;
    /// Newest entries first, capped at `limit`.
    fn list_recent(
        &self,
        limit: u64,
    ) -> impl Future<Output = InnkeepResult<Vec<AuditLogEntry>>> + Send;
    fn list_by_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = InnkeepResult<Vec<AuditLogEntry>>> + Send;
    fn list_by_action(
        &self,
        action: &str,
    ) -> impl Future<Output = InnkeepResult<Vec<AuditLogEntry>>> + Send;
    /// Delete entries older than `cutoff`; returns how many were removed.
    fn clear_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = InnkeepResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Settings (singleton)
// ---------------------------------------------------------------------------

pub trait SettingsRepository: Send + Sync {
    /// Returns the settings record, creating it with defaults on first use.
    fn get(&self) -> impl Future<Output = InnkeepResult<Settings>> + Send;
    fn update(
        &self,
        input: UpdateSettings,
    ) -> impl Future<Output = InnkeepResult<Settings>> + Send;
}
