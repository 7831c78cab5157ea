//! SurrealDB implementation of [`BookingRepository`].
//!
//! The repository is deliberately dumb storage: date validation,
//! conflict detection, and the status state machine live in the
//! lifecycle service. Status strings here must match the schema
//! ASSERT list.

use chrono::{DateTime, Utc};
use innkeep_core::error::InnkeepResult;
use innkeep_core::models::booking::{
    Booking, BookingStatus, NewBooking, PaymentStatus, UpdateBooking,
};
use innkeep_core::repository::BookingRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
pub(crate) struct BookingRow {
    guest_name: String,
    guest_contact: String,
    room_id: String,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    status: String,
    payment_status: String,
    total_cost: f64,
    paid_amount: f64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
pub(crate) struct BookingRowWithId {
    record_id: String,
    guest_name: String,
    guest_contact: String,
    room_id: String,
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
    status: String,
    payment_status: String,
    total_cost: f64,
    paid_amount: f64,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

pub(crate) fn parse_booking_status(s: &str) -> Result<BookingStatus, DbError> {
    match s {
        "Reserved" => Ok(BookingStatus::Reserved),
        "Checked-in" => Ok(BookingStatus::CheckedIn),
        "Checked-out" => Ok(BookingStatus::CheckedOut),
        "Cancelled" => Ok(BookingStatus::Cancelled),
        other => Err(DbError::Migration(format!(
            "unknown booking status: {other}"
        ))),
    }
}

fn parse_payment_status(s: &str) -> Result<PaymentStatus, DbError> {
    match s {
        "Unpaid" => Ok(PaymentStatus::Unpaid),
        "Partial" => Ok(PaymentStatus::Partial),
        "Paid" => Ok(PaymentStatus::Paid),
        other => Err(DbError::Migration(format!(
            "unknown payment status: {other}"
        ))),
    }
}

impl BookingRow {
    fn into_booking(self, id: Uuid) -> Result<Booking, DbError> {
        let room_id = Uuid::parse_str(&self.room_id)
            .map_err(|e| DbError::Migration(format!("invalid room UUID: {e}")))?;
        Ok(Booking {
            id,
            guest_name: self.guest_name,
            guest_contact: self.guest_contact,
            room_id,
            check_in: self.check_in,
            check_out: self.check_out,
            status: parse_booking_status(&self.status)?,
            payment_status: parse_payment_status(&self.payment_status)?,
            total_cost: self.total_cost,
            paid_amount: self.paid_amount,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl BookingRowWithId {
    pub(crate) fn try_into_booking(self) -> Result<Booking, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let room_id = Uuid::parse_str(&self.room_id)
            .map_err(|e| DbError::Migration(format!("invalid room UUID: {e}")))?;
        Ok(Booking {
            id,
            guest_name: self.guest_name,
            guest_contact: self.guest_contact,
            room_id,
            check_in: self.check_in,
            check_out: self.check_out,
            status: parse_booking_status(&self.status)?,
            payment_status: parse_payment_status(&self.payment_status)?,
            total_cost: self.total_cost,
            paid_amount: self.paid_amount,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn rows_to_bookings(rows: Vec<BookingRowWithId>) -> Result<Vec<Booking>, DbError> {
    rows.into_iter().map(|row| row.try_into_booking()).collect()
}

/// SurrealDB implementation of the Booking repository.
#[derive(Clone)]
pub struct SurrealBookingRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealBookingRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> BookingRepository for SurrealBookingRepository<C> {
    async fn create(&self, input: NewBooking) -> InnkeepResult<Booking> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('booking', $id) SET \
                 guest_name = $guest_name, \
                 guest_contact = $guest_contact, \
                 room_id = $room_id, \
                 check_in = $check_in, \
                 check_out = $check_out, \
                 status = $status, \
                 payment_status = $payment_status, \
                 total_cost = $total_cost, \
                 paid_amount = $paid_amount, \
                 notes = $notes",
            )
            .bind(("id", id_str.clone()))
            .bind(("guest_name", input.guest_name))
            .bind(("guest_contact", input.guest_contact))
            .bind(("room_id", input.room_id.to_string()))
            .bind(("check_in", input.check_in))
            .bind(("check_out", input.check_out))
            .bind(("status", input.status.to_string()))
            .bind(("payment_status", input.payment_status.to_string()))
            .bind(("total_cost", input.total_cost))
            .bind(("paid_amount", input.paid_amount))
            .bind(("notes", input.notes))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(row.into_booking(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> InnkeepResult<Booking> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('booking', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(row.into_booking(id)?)
    }

    async fn list(&self) -> InnkeepResult<Vec<Booking>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM booking \
                 ORDER BY check_in DESC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows_to_bookings(rows)?)
    }

    async fn list_by_room(&self, room_id: Uuid) -> InnkeepResult<Vec<Booking>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM booking \
                 WHERE room_id = $room_id \
                 ORDER BY check_in ASC",
            )
            .bind(("room_id", room_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows_to_bookings(rows)?)
    }

    async fn list_checking_in_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> InnkeepResult<Vec<Booking>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM booking \
                 WHERE check_in >= $start AND check_in < $end \
                 ORDER BY check_in ASC",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows_to_bookings(rows)?)
    }

    async fn list_checking_out_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> InnkeepResult<Vec<Booking>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM booking \
                 WHERE check_out >= $start AND check_out < $end \
                 ORDER BY check_out ASC",
            )
            .bind(("start", start))
            .bind(("end", end))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<BookingRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows_to_bookings(rows)?)
    }

    async fn update(&self, id: Uuid, input: UpdateBooking) -> InnkeepResult<Booking> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.guest_name.is_some() {
            sets.push("guest_name = $guest_name");
        }
        if input.guest_contact.is_some() {
            sets.push("guest_contact = $guest_contact");
        }
        if input.room_id.is_some() {
            sets.push("room_id = $room_id");
        }
        if input.check_in.is_some() {
            sets.push("check_in = $check_in");
        }
        if input.check_out.is_some() {
            sets.push("check_out = $check_out");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.payment_status.is_some() {
            sets.push("payment_status = $payment_status");
        }
        if input.total_cost.is_some() {
            sets.push("total_cost = $total_cost");
        }
        if input.paid_amount.is_some() {
            sets.push("paid_amount = $paid_amount");
        }
        if input.notes.is_some() {
            sets.push("notes = $notes");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('booking', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(guest_name) = input.guest_name {
            builder = builder.bind(("guest_name", guest_name));
        }
        if let Some(guest_contact) = input.guest_contact {
            builder = builder.bind(("guest_contact", guest_contact));
        }
        if let Some(room_id) = input.room_id {
            builder = builder.bind(("room_id", room_id.to_string()));
        }
        if let Some(check_in) = input.check_in {
            builder = builder.bind(("check_in", check_in));
        }
        if let Some(check_out) = input.check_out {
            builder = builder.bind(("check_out", check_out));
        }
        if let Some(status) = input.status {
            builder = builder.bind(("status", status.to_string()));
        }
        if let Some(payment_status) = input.payment_status {
            builder = builder.bind(("payment_status", payment_status.to_string()));
        }
        if let Some(total_cost) = input.total_cost {
            builder = builder.bind(("total_cost", total_cost));
        }
        if let Some(paid_amount) = input.paid_amount {
            builder = builder.bind(("paid_amount", paid_amount));
        }
        if let Some(notes) = input.notes {
            // notes is Option<Option<String>>: Some(Some(v)) = set, Some(None) = clear
            builder = builder.bind(("notes", notes));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<BookingRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "booking".into(),
            id: id_str,
        })?;

        Ok(row.into_booking(id)?)
    }

    async fn delete(&self, id: Uuid) -> InnkeepResult<()> {
        self.db
            .query("DELETE type::record('booking', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
