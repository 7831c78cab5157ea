//! Bulk export/import of the whole store as a single JSON document,
//! plus the destructive data reset.
//!
//! The document shape is
//! `{ users, rooms, bookings, settings, auditLogs, exportedAt }`.
//! Sessions are never exported. Import replaces table contents
//! wholesale, preserving record ids and timestamps from the document.

use chrono::{DateTime, Utc};
use innkeep_core::error::{InnkeepError, InnkeepResult};
use innkeep_core::models::{
    audit::AuditLogEntry, booking::Booking, room::Room, settings::Settings, user::User,
};
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;
use crate::repository::audit::AuditRowWithId;
use crate::repository::booking::BookingRowWithId;
use crate::repository::room::RoomRowWithId;
use crate::repository::settings::SettingsRow;
use crate::repository::user::UserRowWithId;

/// The full-store export document.
///
/// Every collection field is required on import; a document missing
/// one of them is rejected as malformed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub users: Vec<User>,
    pub rooms: Vec<Room>,
    pub bookings: Vec<Booking>,
    pub settings: Vec<Settings>,
    pub audit_logs: Vec<AuditLogEntry>,
    pub exported_at: DateTime<Utc>,
}

// -----------------------------------------------------------------------
// Export
// -----------------------------------------------------------------------

/// Read every exportable table into an [`ExportDocument`].
pub async fn export_all<C: Connection>(db: &Surreal<C>) -> InnkeepResult<ExportDocument> {
    let mut result = db
        .query(
            "SELECT meta::id(id) AS record_id, * FROM user \
             ORDER BY created_at ASC",
        )
        .query(
            "SELECT meta::id(id) AS record_id, * FROM room \
             ORDER BY room_number ASC",
        )
        .query(
            "SELECT meta::id(id) AS record_id, * FROM booking \
             ORDER BY created_at ASC",
        )
        .query("SELECT * FROM settings")
        .query(
            "SELECT meta::id(id) AS record_id, * FROM audit_log \
             ORDER BY timestamp ASC",
        )
        .await
        .map_err(DbError::from)?;

    let user_rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
    let room_rows: Vec<RoomRowWithId> = result.take(1).map_err(DbError::from)?;
    let booking_rows: Vec<BookingRowWithId> = result.take(2).map_err(DbError::from)?;
    let settings_rows: Vec<SettingsRow> = result.take(3).map_err(DbError::from)?;
    let audit_rows: Vec<AuditRowWithId> = result.take(4).map_err(DbError::from)?;

    let users = user_rows
        .into_iter()
        .map(|row| row.try_into_user())
        .collect::<Result<Vec<_>, DbError>>()?;
    let rooms = room_rows
        .into_iter()
        .map(|row| row.try_into_room())
        .collect::<Result<Vec<_>, DbError>>()?;
    let bookings = booking_rows
        .into_iter()
        .map(|row| row.try_into_booking())
        .collect::<Result<Vec<_>, DbError>>()?;
    let settings = settings_rows
        .into_iter()
        .map(|row| row.into_settings())
        .collect::<Result<Vec<_>, DbError>>()?;
    let audit_logs = audit_rows
        .into_iter()
        .map(|row| row.try_into_entry())
        .collect::<Result<Vec<_>, DbError>>()?;

    Ok(ExportDocument {
        users,
        rooms,
        bookings,
        settings,
        audit_logs,
        exported_at: Utc::now(),
    })
}

/// Serialize the whole store to a pretty-printed JSON document.
pub async fn export_json<C: Connection>(db: &Surreal<C>) -> InnkeepResult<String> {
    let document = export_all(db).await?;
    serde_json::to_string_pretty(&document)
        .map_err(|e| InnkeepError::Database(format!("export serialization failed: {e}")))
}

// -----------------------------------------------------------------------
// Import
// -----------------------------------------------------------------------

/// Destructively replace the store contents from a JSON export.
///
/// Rejects documents that are not valid JSON or are missing one of the
/// expected collection fields with [`InnkeepError::InvalidImport`]
/// before anything is cleared. Sessions are left untouched.
pub async fn import_json<C: Connection>(db: &Surreal<C>, json: &str) -> InnkeepResult<()> {
    let document: ExportDocument =
        serde_json::from_str(json).map_err(|e| InnkeepError::InvalidImport {
            message: e.to_string(),
        })?;

    import_all(db, &document).await
}

/// Destructively replace the store contents from a parsed document.
pub async fn import_all<C: Connection>(
    db: &Surreal<C>,
    document: &ExportDocument,
) -> InnkeepResult<()> {
    db.query("DELETE user")
        .query("DELETE room")
        .query("DELETE booking")
        .query("DELETE settings")
        .query("DELETE audit_log")
        .await
        .map_err(DbError::from)?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    for user in &document.users {
        restore_user(db, user).await?;
    }
    for room in &document.rooms {
        restore_room(db, room).await?;
    }
    for booking in &document.bookings {
        restore_booking(db, booking).await?;
    }
    for settings in &document.settings {
        restore_settings(db, settings).await?;
    }
    for entry in &document.audit_logs {
        restore_audit_entry(db, entry).await?;
    }

    info!(
        users = document.users.len(),
        rooms = document.rooms.len(),
        bookings = document.bookings.len(),
        audit_logs = document.audit_logs.len(),
        "Import complete"
    );

    Ok(())
}

// -----------------------------------------------------------------------
// Reset
// -----------------------------------------------------------------------

/// Clear users, rooms, bookings, audit logs, and sessions. Settings
/// survive a reset.
pub async fn reset_all<C: Connection>(db: &Surreal<C>) -> InnkeepResult<()> {
    db.query("DELETE user")
        .query("DELETE room")
        .query("DELETE booking")
        .query("DELETE audit_log")
        .query("DELETE session")
        .await
        .map_err(DbError::from)?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    info!("Store reset");
    Ok(())
}

// -----------------------------------------------------------------------
// Record restoration — explicit ids and timestamps from the document
// -----------------------------------------------------------------------

async fn restore_user<C: Connection>(db: &Surreal<C>, user: &User) -> InnkeepResult<()> {
    db.query(
        "CREATE type::record('user', $id) SET \
         email = $email, \
         password_hash = $password_hash, \
         name = $name, \
         role = $role, \
         created_at = $created_at, \
         updated_at = $updated_at",
    )
    .bind(("id", user.id.to_string()))
    .bind(("email", user.email.clone()))
    .bind(("password_hash", user.password_hash.clone()))
    .bind(("name", user.name.clone()))
    .bind(("role", user.role.to_string()))
    .bind(("created_at", user.created_at))
    .bind(("updated_at", user.updated_at))
    .await
    .map_err(DbError::from)?
    .check()
    .map_err(|e| DbError::Migration(e.to_string()))?;

    Ok(())
}

async fn restore_room<C: Connection>(db: &Surreal<C>, room: &Room) -> InnkeepResult<()> {
    db.query(
        "CREATE type::record('room', $id) SET \
         room_number = $room_number, \
         room_type = $room_type, \
         capacity = $capacity, \
         price_per_night = $price_per_night, \
         status = $status, \
         amenities = $amenities, \
         notes = $notes, \
         created_at = $created_at, \
         updated_at = $updated_at",
    )
    .bind(("id", room.id.to_string()))
    .bind(("room_number", room.room_number.clone()))
    .bind(("room_type", room.room_type.to_string()))
    .bind(("capacity", room.capacity))
    .bind(("price_per_night", room.price_per_night))
    .bind(("status", room.status.to_string()))
    .bind(("amenities", room.amenities.clone()))
    .bind(("notes", room.notes.clone()))
    .bind(("created_at", room.created_at))
    .bind(("updated_at", room.updated_at))
    .await
    .map_err(DbError::from)?
    .check()
    .map_err(|e| DbError::Migration(e.to_string()))?;

    Ok(())
}

async fn restore_booking<C: Connection>(db: &Surreal<C>, booking: &Booking) -> InnkeepResult<()> {
    db.query(
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
         notes = $notes, \
         created_at = $created_at, \
         updated_at = $updated_at",
    )
    .bind(("id", booking.id.to_string()))
    .bind(("guest_name", booking.guest_name.clone()))
    .bind(("guest_contact", booking.guest_contact.clone()))
    .bind(("room_id", booking.room_id.to_string()))
    .bind(("check_in", booking.check_in))
    .bind(("check_out", booking.check_out))
    .bind(("status", booking.status.to_string()))
    .bind(("payment_status", booking.payment_status.to_string()))
    .bind(("total_cost", booking.total_cost))
    .bind(("paid_amount", booking.paid_amount))
    .bind(("notes", booking.notes.clone()))
    .bind(("created_at", booking.created_at))
    .bind(("updated_at", booking.updated_at))
    .await
    .map_err(DbError::from)?
    .check()
    .map_err(|e| DbError::Migration(e.to_string()))?;

    Ok(())
}

async fn restore_settings<C: Connection>(
    db: &Surreal<C>,
    settings: &Settings,
) -> InnkeepResult<()> {
    db.query(
        "CREATE type::record('settings', $id) SET \
         theme = $theme, \
         updated_at = $updated_at",
    )
    .bind(("id", settings.id.clone()))
    .bind(("theme", settings.theme.to_string()))
    .bind(("updated_at", settings.updated_at))
    .await
    .map_err(DbError::from)?
    .check()
    .map_err(|e| DbError::Migration(e.to_string()))?;

    Ok(())
}

async fn restore_audit_entry<C: Connection>(
    db: &Surreal<C>,
    entry: &AuditLogEntry,
) -> InnkeepResult<()> {
    db.query(
        "CREATE type::record('audit_log', $id) SET \
         user_id = $user_id, \
         user_name = $user_name, \
         action = $action, \
         entity_type = $entity_type, \
         entity_id = $entity_id, \
         details = $details, \
         timestamp = $timestamp",
    )
    .bind(("id", entry.id.to_string()))
    .bind(("user_id", entry.user_id.to_string()))
    .bind(("user_name", entry.user_name.clone()))
    .bind(("action", entry.action.clone()))
    .bind(("entity_type", entry.entity_type.clone()))
    .bind(("entity_id", entry.entity_id.clone()))
    .bind(("details", entry.details.clone()))
    .bind(("timestamp", entry.timestamp))
    .await
    .map_err(DbError::from)?
    .check()
    .map_err(|e| DbError::Migration(e.to_string()))?;

    Ok(())
}
