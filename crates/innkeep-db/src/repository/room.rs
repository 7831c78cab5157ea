//! SurrealDB implementation of [`RoomRepository`].
//!
//! Room number uniqueness is checked explicitly before insert so the
//! caller gets a typed [`InnkeepError::DuplicateRoomNumber`]; the
//! unique index on `room_number` is the storage-level backstop.

use chrono::{DateTime, Utc};
use innkeep_core::error::{InnkeepError, InnkeepResult};
use innkeep_core::models::room::{CreateRoom, Room, RoomStatus, RoomType, UpdateRoom};
use innkeep_core::repository::RoomRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
pub(crate) struct RoomRow {
    room_number: String,
    room_type: String,
    capacity: u32,
    price_per_night: f64,
    status: String,
    amenities: Vec<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
pub(crate) struct RoomRowWithId {
    record_id: String,
    room_number: String,
    room_type: String,
    capacity: u32,
    price_per_night: f64,
    status: String,
    amenities: Vec<String>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_room_type(s: &str) -> Result<RoomType, DbError> {
    match s {
        "Single" => Ok(RoomType::Single),
        "Double" => Ok(RoomType::Double),
        "Suite" => Ok(RoomType::Suite),
        "Deluxe" => Ok(RoomType::Deluxe),
        other => Err(DbError::Migration(format!("unknown room type: {other}"))),
    }
}

pub(crate) fn parse_room_status(s: &str) -> Result<RoomStatus, DbError> {
    match s {
        "Available" => Ok(RoomStatus::Available),
        "Occupied" => Ok(RoomStatus::Occupied),
        "Maintenance" => Ok(RoomStatus::Maintenance),
        other => Err(DbError::Migration(format!("unknown room status: {other}"))),
    }
}

impl RoomRow {
    fn into_room(self, id: Uuid) -> Result<Room, DbError> {
        Ok(Room {
            id,
            room_number: self.room_number,
            room_type: parse_room_type(&self.room_type)?,
            capacity: self.capacity,
            price_per_night: self.price_per_night,
            status: parse_room_status(&self.status)?,
            amenities: self.amenities,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl RoomRowWithId {
    pub(crate) fn try_into_room(self) -> Result<Room, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Room {
            id,
            room_number: self.room_number,
            room_type: parse_room_type(&self.room_type)?,
            capacity: self.capacity,
            price_per_night: self.price_per_night,
            status: parse_room_status(&self.status)?,
            amenities: self.amenities,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Room repository.
#[derive(Clone)]
pub struct SurrealRoomRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoomRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoomRepository for SurrealRoomRepository<C> {
    async fn create(&self, input: CreateRoom) -> InnkeepResult<Room> {
        match self.get_by_number(&input.room_number).await {
            Ok(_) => {
                return Err(InnkeepError::DuplicateRoomNumber {
                    room_number: input.room_number,
                });
            }
            Err(InnkeepError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('room', $id) SET \
                 room_number = $room_number, \
                 room_type = $room_type, \
                 capacity = $capacity, \
                 price_per_night = $price_per_night, \
                 status = $status, \
                 amenities = $amenities, \
                 notes = $notes",
            )
            .bind(("id", id_str.clone()))
            .bind(("room_number", input.room_number))
            .bind(("room_type", input.room_type.to_string()))
            .bind(("capacity", input.capacity))
            .bind(("price_per_night", input.price_per_night))
            .bind(("status", input.status.to_string()))
            .bind(("amenities", input.amenities))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RoomRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "room".into(),
            id: id_str,
        })?;

        Ok(row.into_room(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InnkeepResult<Room> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('room', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoomRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "room".into(),
            id: id_str,
        })?;

        Ok(row.into_room(id)?)
    }

    async fn get_by_number(&self, room_number: &str) -> InnkeepResult<Room> {
        let room_number_owned = room_number.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM room \
                 WHERE room_number = $room_number",
            )
            .bind(("room_number", room_number_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoomRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "room".into(),
            id: format!("room_number={room_number_owned}"),
        })?;

        Ok(row.try_into_room()?)
    }

    async fn list(&self) -> InnkeepResult<Vec<Room>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM room \
                 ORDER BY room_number ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoomRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_room())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_by_status(&self, status: RoomStatus) -> InnkeepResult<Vec<Room>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM room \
                 WHERE status = $status \
                 ORDER BY room_number ASC",
            )
            .bind(("status", status.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoomRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_room())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn update(&self, id: Uuid, input: UpdateRoom) -> InnkeepResult<Room> {
        // Renaming into an existing room number is rejected.
        if let Some(ref room_number) = input.room_number {
            match self.get_by_number(room_number).await {
                Ok(existing) if existing.id != id => {
                    return Err(InnkeepError::DuplicateRoomNumber {
                        room_number: room_number.clone(),
                    });
                }
                Ok(_) | Err(InnkeepError::NotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.room_number.is_some() {
            sets.push("room_number = $room_number");
        }
        if input.room_type.is_some() {
            sets.push("room_type = $room_type");
        }
        if input.capacity.is_some() {
            sets.push("capacity = $capacity");
        }
        if input.price_per_night.is_some() {
            sets.push("price_per_night = $price_per_night");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.amenities.is_some() {
            sets.push("amenities = $amenities");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('room', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(room_number) = input.room_number {
            builder = builder.bind(("room_number", room_number));
        }
        if let Some(room_type) = input.room_type {
            builder = builder.bind(("room_type", room_type.to_string()));
        }
        if let Some(capacity) = input.capacity {
            builder = builder.bind(("capacity", capacity));
        }
        if let Some(price_per_night) = input.price_per_night {
            builder = builder.bind(("price_per_night", price_per_night));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.to_string()));
        }
        if let Some(amenities) = input.amenities {
            builder = builder.bind(("amenities", amenities));
        }
        if let Some(notes) = input.notes {
            // notes is Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RoomRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "room".into(),
            id: id_str,
        })?;

        Ok(row.into_room(id)?)
    }

    async fn delete(&self, id: Uuid) -> InnkeepResult<()> {
        self.db
            .query("DELETE type::record('room', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
