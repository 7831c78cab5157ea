//! Room domain model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoomType {
    Single,
    Double,
    Suite,
    Deluxe,
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoomType::Single => "Single",
            RoomType::Double => "Double",
            RoomType::Suite => "Suite",
            RoomType::Deluxe => "Deluxe",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoomStatus::Available => "Available",
            RoomStatus::Occupied => "Occupied",
            RoomStatus::Maintenance => "Maintenance",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub room_number: String,
    pub room_type: RoomType,
    pub capacity: u32,
    pub price_per_night: f64,
    pub status: RoomStatus,
    pub amenities: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoom {
    pub room_number: String,
    pub room_type: RoomType,
    pub capacity: u32,
    pub price_per_night: f64,
    pub status: RoomStatus,
    pub amenities: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateRoom {
    pub room_number: Option<String>,
    pub room_type: Option<RoomType>,
    pub capacity: Option<u32>,
    pub price_per_night: Option<f64>,
    pub status: Option<RoomStatus>,
    pub amenities: Option<Vec<String>>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub notes: Option<Option<String>>,
}

/// Filters for room list queries. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub status: Option<RoomStatus>,
    pub room_type: Option<RoomType>,
    pub min_capacity: Option<u32>,
    pub max_price: Option<f64>,
    /// Case-insensitive substring match on room number, type, or notes.
    pub search: Option<String>,
}
