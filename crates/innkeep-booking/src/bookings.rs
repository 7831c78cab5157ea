//! Booking lifecycle service — the conflict engine entry points and
//! the status state machine with its room-status side effects.
//!
//! Mutating operations run their whole read-check-write sequence under
//! the shared [`WriteLock`]; the room status flips in the lifecycle
//! table below happen inside the same locked section as the booking
//! write.
//!
//! ```text
//! create ──► Reserved ──check_in──► Checked-in ──check_out──► Checked-out
//!    │           │                      │
//!    │           └───────cancel─────────┴──► Cancelled
//!    └──► Checked-in (walk-in)
//! ```

use chrono::{DateTime, Duration, NaiveTime, Utc};
use innkeep_core::error::{InnkeepError, InnkeepResult};
use innkeep_core::models::booking::{
    Booking, BookingFilter, BookingStatus, NewBooking, PaymentStatus, UpdateBooking,
};
use innkeep_core::models::room::{RoomStatus, UpdateRoom};
use innkeep_core::repository::{BookingRepository, RoomRepository};
use tracing::info;
use uuid::Uuid;

use crate::lock::WriteLock;
use crate::overlap::{nights, overlaps};

/// Input for creating a booking.
///
/// `status` may be Reserved or, for walk-ins, Checked-in; anything
/// else is rejected.
#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    pub guest_name: String,
    pub guest_contact: String,
    pub room_id: Uuid,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub paid_amount: f64,
    pub notes: Option<String>,
}

/// Input for updating a booking's guest fields, dates, or room.
///
/// Status is deliberately absent — transitions go through
/// [`BookingService::check_in`], [`BookingService::check_out`], and
/// [`BookingService::cancel`].
#[derive(Debug, Clone, Default)]
pub struct UpdateBookingInput {
    pub guest_name: Option<String>,
    pub guest_contact: Option<String>,
    pub room_id: Option<Uuid>,
    pub check_in: Option<DateTime<Utc>>,
    pub check_out: Option<DateTime<Utc>>,
    pub payment_status: Option<PaymentStatus>,
    pub paid_amount: Option<f64>,
    /// `Some(Some(val))` = set, `Some(None)` = clear, `None` = no change.
    pub notes: Option<Option<String>>,
}

/// Booking lifecycle service.
///
/// Generic over repository implementations so this layer has no
/// dependency on the database crate.
pub struct BookingService<R: RoomRepository, B: BookingRepository> {
    rooms: R,
    bookings: B,
    guard: WriteLock,
}

impl<R: RoomRepository, B: BookingRepository> BookingService<R, B> {
    pub fn new(rooms: R, bookings: B, guard: WriteLock) -> Self {
        Self {
            rooms,
            bookings,
            guard,
        }
    }

    /// Create a booking in Reserved, or directly Checked-in for
    /// walk-ins (which marks the room Occupied).
    pub async fn create_booking(&self, input: CreateBookingInput) -> InnkeepResult<Booking> {
        let _guard = self.guard.acquire().await;

        if input.check_out <= input.check_in {
            return Err(InnkeepError::Validation {
                message: "check-out date must be after check-in date".into(),
            });
        }
        match input.status {
            BookingStatus::Reserved | BookingStatus::CheckedIn => {}
            other => {
                return Err(InnkeepError::Validation {
                    message: format!("a new booking cannot start as {other}"),
                });
            }
        }
        if input.paid_amount < 0.0 {
            return Err(InnkeepError::Validation {
                message: "paid amount must not be negative".into(),
            });
        }

        let room = self.rooms.get_by_id(input.room_id).await?;

        let conflicts = self
            .conflicting_bookings(room.id, input.check_in, input.check_out, None)
            .await?;
        if !conflicts.is_empty() {
            return Err(InnkeepError::RoomUnavailable { room_id: room.id });
        }

        let total_cost = nights(input.check_in, input.check_out) as f64 * room.price_per_night;

        let booking = self
            .bookings
            .create(NewBooking {
                guest_name: input.guest_name,
                guest_contact: input.guest_contact,
                room_id: room.id,
                check_in: input.check_in,
                check_out: input.check_out,
                status: input.status,
                payment_status: input.payment_status,
                total_cost,
                paid_amount: input.paid_amount,
                notes: input.notes,
            })
            .await?;

        if booking.status == BookingStatus::CheckedIn {
            self.set_room_status(room.id, RoomStatus::Occupied).await?;
        }

        info!(
            booking_id = %booking.id,
            room_id = %room.id,
            status = %booking.status,
            total_cost = booking.total_cost,
            "Booking created"
        );
        Ok(booking)
    }

    pub async fn booking(&self, id: Uuid) -> InnkeepResult<Booking> {
        self.bookings.get_by_id(id).await
    }

    /// All bookings, newest check-in first.
    pub async fn list_bookings(&self) -> InnkeepResult<Vec<Booking>> {
        self.bookings.list().await
    }

    /// Update guest fields, dates, or the room. Re-runs the conflict
    /// check against the candidate room/date range (excluding this
    /// booking) and recomputes the total cost when dates or room
    /// change.
    pub async fn update_booking(
        &self,
        id: Uuid,
        input: UpdateBookingInput,
    ) -> InnkeepResult<Booking> {
        let _guard = self.guard.acquire().await;

        let booking = self.bookings.get_by_id(id).await?;

        let new_check_in = input.check_in.unwrap_or(booking.check_in);
        let new_check_out = input.check_out.unwrap_or(booking.check_out);
        if new_check_out <= new_check_in {
            return Err(InnkeepError::Validation {
                message: "check-out date must be after check-in date".into(),
            });
        }
        if let Some(paid_amount) = input.paid_amount {
            if paid_amount < 0.0 {
                return Err(InnkeepError::Validation {
                    message: "paid amount must not be negative".into(),
                });
            }
        }

        let new_room_id = input.room_id.unwrap_or(booking.room_id);

        let conflicts = self
            .conflicting_bookings(new_room_id, new_check_in, new_check_out, Some(id))
            .await?;
        if !conflicts.is_empty() {
            return Err(InnkeepError::RoomUnavailable {
                room_id: new_room_id,
            });
        }

        // Recompute the total when dates or room changed.
        let total_cost = if input.check_in.is_some()
            || input.check_out.is_some()
            || input.room_id.is_some()
        {
            let room = self.rooms.get_by_id(new_room_id).await?;
            Some(nights(new_check_in, new_check_out) as f64 * room.price_per_night)
        } else {
            None
        };

        self.bookings
            .update(
                id,
                UpdateBooking {
                    guest_name: input.guest_name,
                    guest_contact: input.guest_contact,
                    room_id: input.room_id,
                    check_in: input.check_in,
                    check_out: input.check_out,
                    status: None,
                    payment_status: input.payment_status,
                    total_cost,
                    paid_amount: input.paid_amount,
                    notes: input.notes,
                },
            )
            .await
    }

    /// Reserved → Checked-in. Marks the room Occupied.
    pub async fn check_in(&self, id: Uuid) -> InnkeepResult<Booking> {
        let _guard = self.guard.acquire().await;

        let booking = self.bookings.get_by_id(id).await?;
        if booking.status != BookingStatus::Reserved {
            return Err(InnkeepError::InvalidTransition {
                current: booking.status,
                requested: BookingStatus::CheckedIn,
            });
        }

        let updated = self
            .set_booking_status(id, BookingStatus::CheckedIn)
            .await?;
        self.set_room_status(booking.room_id, RoomStatus::Occupied)
            .await?;

        info!(booking_id = %id, room_id = %booking.room_id, "Guest checked in");
        Ok(updated)
    }

    /// Checked-in → Checked-out. Marks the room Available.
    pub async fn check_out(&self, id: Uuid) -> InnkeepResult<Booking> {
        let _guard = self.guard.acquire().await;

        let booking = self.bookings.get_by_id(id).await?;
        if booking.status != BookingStatus::CheckedIn {
            return Err(InnkeepError::InvalidTransition {
                current: booking.status,
                requested: BookingStatus::CheckedOut,
            });
        }

        let updated = self
            .set_booking_status(id, BookingStatus::CheckedOut)
            .await?;
        self.set_room_status(booking.room_id, RoomStatus::Available)
            .await?;

        info!(booking_id = %id, room_id = %booking.room_id, "Guest checked out");
        Ok(updated)
    }

    /// Reserved/Checked-in → Cancelled. Frees the room only when the
    /// guest was already checked in.
    pub async fn cancel(&self, id: Uuid) -> InnkeepResult<Booking> {
        let _guard = self.guard.acquire().await;

        let booking = self.bookings.get_by_id(id).await?;
        if booking.status.is_terminal() {
            return Err(InnkeepError::InvalidTransition {
                current: booking.status,
                requested: BookingStatus::Cancelled,
            });
        }

        let updated = self
            .set_booking_status(id, BookingStatus::Cancelled)
            .await?;
        if booking.status == BookingStatus::CheckedIn {
            self.set_room_status(booking.room_id, RoomStatus::Available)
                .await?;
        }

        info!(booking_id = %id, room_id = %booking.room_id, "Booking cancelled");
        Ok(updated)
    }

    /// The conflict engine: every active booking on the room whose
    /// half-open interval intersects `[check_in, check_out)`,
    /// optionally excluding one booking id (for updates).
    pub async fn overlapping_bookings(
        &self,
        room_id: Uuid,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> InnkeepResult<Vec<Booking>> {
        self.conflicting_bookings(room_id, check_in, check_out, exclude)
            .await
    }

    /// In-memory filtering over the full booking list, newest
    /// check-in first.
    pub async fn filter_bookings(&self, filter: BookingFilter) -> InnkeepResult<Vec<Booking>> {
        let mut bookings = self.bookings.list().await?;

        if let Some(status) = filter.status {
            bookings.retain(|b| b.status == status);
        }
        if let Some(room_id) = filter.room_id {
            bookings.retain(|b| b.room_id == room_id);
        }
        if let Some(start) = filter.start {
            bookings.retain(|b| b.check_in >= start);
        }
        if let Some(end) = filter.end {
            bookings.retain(|b| b.check_out <= end);
        }
        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            bookings.retain(|b| {
                b.guest_name.to_lowercase().contains(&needle)
                    || b.guest_contact.to_lowercase().contains(&needle)
            });
        }

        Ok(bookings)
    }

    /// Active bookings checking in within the next `days` days.
    pub async fn upcoming_bookings(&self, days: i64) -> InnkeepResult<Vec<Booking>> {
        let now = Utc::now();
        let horizon = now + Duration::days(days);

        let bookings = self.bookings.list_checking_in_between(now, horizon).await?;
        Ok(bookings.into_iter().filter(|b| b.is_active()).collect())
    }

    /// Reserved bookings whose check-in date is today.
    pub async fn today_check_ins(&self) -> InnkeepResult<Vec<Booking>> {
        let (start, end) = today_bounds();
        let bookings = self.bookings.list_checking_in_between(start, end).await?;
        Ok(bookings
            .into_iter()
            .filter(|b| b.status == BookingStatus::Reserved)
            .collect())
    }

    /// Checked-in bookings whose check-out date is today.
    pub async fn today_check_outs(&self) -> InnkeepResult<Vec<Booking>> {
        let (start, end) = today_bounds();
        let bookings = self.bookings.list_checking_out_between(start, end).await?;
        Ok(bookings
            .into_iter()
            .filter(|b| b.status == BookingStatus::CheckedIn)
            .collect())
    }

    async fn conflicting_bookings(
        &self,
        room_id: Uuid,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> InnkeepResult<Vec<Booking>> {
        let bookings = self.bookings.list_by_room(room_id).await?;

        Ok(bookings
            .into_iter()
            .filter(|booking| {
                if exclude == Some(booking.id) {
                    return false;
                }
                // Cancelled and checked-out bookings hold no claim on the room.
                if !booking.is_active() {
                    return false;
                }
                overlaps(check_in, check_out, booking.check_in, booking.check_out)
            })
            .collect())
    }

    async fn set_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> InnkeepResult<Booking> {
        self.bookings
            .update(
                id,
                UpdateBooking {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await
    }

    async fn set_room_status(&self, room_id: Uuid, status: RoomStatus) -> InnkeepResult<()> {
        self.rooms
            .update(
                room_id,
                UpdateRoom {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }
}

/// `[midnight today, midnight tomorrow)` in UTC.
fn today_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc::now()
        .date_naive()
        .and_time(NaiveTime::MIN)
        .and_utc();
    (start, start + Duration::days(1))
}
