//! Room store service — CRUD, filtering, the deletion guard, and the
//! availability query.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use innkeep_core::error::{InnkeepError, InnkeepResult};
use innkeep_core::models::room::{CreateRoom, Room, RoomFilter, RoomStatus, UpdateRoom};
use innkeep_core::repository::{BookingRepository, RoomRepository};
use tracing::info;
use uuid::Uuid;

use crate::lock::WriteLock;
use crate::overlap::overlaps;

/// Room store service.
///
/// Generic over repository implementations so this layer has no
/// dependency on the database crate. The booking repository is
/// consulted for the cross-component deletion guard and the
/// availability query.
pub struct RoomService<R: RoomRepository, B: BookingRepository> {
    rooms: R,
    bookings: B,
    guard: WriteLock,
}

impl<R: RoomRepository, B: BookingRepository> RoomService<R, B> {
    pub fn new(rooms: R, bookings: B, guard: WriteLock) -> Self {
        Self {
            rooms,
            bookings,
            guard,
        }
    }

    /// Create a room. Duplicate room numbers are rejected.
    pub async fn create_room(&self, input: CreateRoom) -> InnkeepResult<Room> {
        validate_room_fields(&input.room_number, input.capacity, input.price_per_night)?;

        let _guard = self.guard.acquire().await;
        let room = self.rooms.create(input).await?;
        info!(room_id = %room.id, room_number = %room.room_number, "Room created");
        Ok(room)
    }

    pub async fn room(&self, id: Uuid) -> InnkeepResult<Room> {
        self.rooms.get_by_id(id).await
    }

    /// All rooms, ordered by room number.
    pub async fn list_rooms(&self) -> InnkeepResult<Vec<Room>> {
        self.rooms.list().await
    }

    /// In-memory filtering over the full room list.
    pub async fn filter_rooms(&self, filter: RoomFilter) -> InnkeepResult<Vec<Room>> {
        let mut rooms = self.rooms.list().await?;

        if let Some(status) = filter.status {
            rooms.retain(|room| room.status == status);
        }
        if let Some(room_type) = filter.room_type {
            rooms.retain(|room| room.room_type == room_type);
        }
        if let Some(min_capacity) = filter.min_capacity {
            rooms.retain(|room| room.capacity >= min_capacity);
        }
        if let Some(max_price) = filter.max_price {
            rooms.retain(|room| room.price_per_night <= max_price);
        }
        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            rooms.retain(|room| {
                room.room_number.to_lowercase().contains(&needle)
                    || room.room_type.to_string().to_lowercase().contains(&needle)
                    || room
                        .notes
                        .as_ref()
                        .is_some_and(|notes| notes.to_lowercase().contains(&needle))
            });
        }

        Ok(rooms)
    }

    /// Update a room. Renaming into an existing room number is rejected.
    pub async fn update_room(&self, id: Uuid, input: UpdateRoom) -> InnkeepResult<Room> {
        if let Some(ref room_number) = input.room_number {
            if room_number.trim().is_empty() {
                return Err(InnkeepError::Validation {
                    message: "room number must not be empty".into(),
                });
            }
        }
        if input.capacity == Some(0) {
            return Err(InnkeepError::Validation {
                message: "capacity must be a positive number".into(),
            });
        }
        if let Some(price) = input.price_per_night {
            if price <= 0.0 {
                return Err(InnkeepError::Validation {
                    message: "price per night must be a positive number".into(),
                });
            }
        }

        let _guard = self.guard.acquire().await;
        self.rooms.update(id, input).await
    }

    /// Delete a room. Blocked while any Reserved or Checked-in booking
    /// still references it.
    pub async fn delete_room(&self, id: Uuid) -> InnkeepResult<()> {
        let _guard = self.guard.acquire().await;

        let room = self.rooms.get_by_id(id).await?;

        let active = self
            .bookings
            .list_by_room(room.id)
            .await?
            .into_iter()
            .filter(|booking| booking.is_active())
            .count();
        if active > 0 {
            return Err(InnkeepError::RoomHasActiveBookings {
                room_id: room.id,
                count: active,
            });
        }

        self.rooms.delete(room.id).await?;
        info!(room_id = %room.id, room_number = %room.room_number, "Room deleted");
        Ok(())
    }

    /// Rooms free for the whole of `[check_in, check_out)`.
    ///
    /// Only rooms whose current status is Available are considered;
    /// rooms that are Occupied or under Maintenance today are never
    /// reported, even when the requested range lies beyond their
    /// current booking.
    pub async fn available_rooms(
        &self,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> InnkeepResult<Vec<Room>> {
        if check_out <= check_in {
            return Err(InnkeepError::Validation {
                message: "check-out date must be after check-in date".into(),
            });
        }

        let available = self.rooms.list_by_status(RoomStatus::Available).await?;

        let booked: HashSet<Uuid> = self
            .bookings
            .list()
            .await?
            .into_iter()
            .filter(|booking| {
                booking.is_active()
                    && overlaps(check_in, check_out, booking.check_in, booking.check_out)
            })
            .map(|booking| booking.room_id)
            .collect();

        Ok(available
            .into_iter()
            .filter(|room| !booked.contains(&room.id))
            .collect())
    }
}

fn validate_room_fields(room_number: &str, capacity: u32, price: f64) -> InnkeepResult<()> {
    if room_number.trim().is_empty() {
        return Err(InnkeepError::Validation {
            message: "room number must not be empty".into(),
        });
    }
    if capacity == 0 {
        return Err(InnkeepError::Validation {
            message: "capacity must be a positive number".into(),
        });
    }
    if price <= 0.0 {
        return Err(InnkeepError::Validation {
            message: "price per night must be a positive number".into(),
        });
    }
    Ok(())
}
