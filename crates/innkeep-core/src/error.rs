//! Error types for the Innkeep system.

use thiserror::Error;
use uuid::Uuid;

use crate::models::booking::BookingStatus;

#[derive(Debug, Error)]
pub enum InnkeepError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Room number already in use: {room_number}")]
    DuplicateRoomNumber { room_number: String },

    #[error("Email already in use: {email}")]
    DuplicateEmail { email: String },

    #[error("Room {room_id} is not available for the selected dates")]
    RoomUnavailable { room_id: Uuid },

    #[error("Invalid booking transition: {current} -> {requested}")]
    InvalidTransition {
        current: BookingStatus,
        requested: BookingStatus,
    },

    #[error("Room {room_id} has {count} active booking(s)")]
    RoomHasActiveBookings { room_id: Uuid, count: usize },

    #[error("Cannot delete the last admin user")]
    LastAdmin,

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Invalid import document: {message}")]
    InvalidImport { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

pub type InnkeepResult<T> = Result<T, InnkeepError>;
