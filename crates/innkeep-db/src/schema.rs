//! Schema definitions and migration runner for the embedded store.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Rooms
-- =======================================================================
DEFINE TABLE room SCHEMAFULL;
DEFINE FIELD room_number ON TABLE room TYPE string;
DEFINE FIELD room_type ON TABLE room TYPE string \
    ASSERT $value IN ['Single', 'Double', 'Suite', 'Deluxe'];
DEFINE FIELD capacity ON TABLE room TYPE int;
DEFINE FIELD price_per_night ON TABLE room TYPE float;
DEFINE FIELD status ON TABLE room TYPE string \
    ASSERT $value IN ['Available', 'Occupied', 'Maintenance'];
DEFINE FIELD amenities ON TABLE room TYPE array DEFAULT [];
DEFINE FIELD amenities.* ON TABLE room TYPE string;
DEFINE FIELD notes ON TABLE room TYPE option<string>;
DEFINE FIELD created_at ON TABLE room TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE room TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_room_number ON TABLE room \
    COLUMNS room_number UNIQUE;
DEFINE INDEX idx_room_status ON TABLE room COLUMNS status;

-- =======================================================================
-- Bookings
-- =======================================================================
DEFINE TABLE booking SCHEMAFULL;
DEFINE FIELD guest_name ON TABLE booking TYPE string;
DEFINE FIELD guest_contact ON TABLE booking TYPE string;
DEFINE FIELD room_id ON TABLE booking TYPE string;
DEFINE FIELD check_in ON TABLE booking TYPE datetime;
DEFINE FIELD check_out ON TABLE booking TYPE datetime;
DEFINE FIELD status ON TABLE booking TYPE string \
    ASSERT $value IN ['Reserved', 'Checked-in', 'Checked-out', \
    'Cancelled'];
DEFINE FIELD payment_status ON TABLE booking TYPE string \
    ASSERT $value IN ['Unpaid', 'Partial', 'Paid'];
DEFINE FIELD total_cost ON TABLE booking TYPE float;
DEFINE FIELD paid_amount ON TABLE booking TYPE float DEFAULT 0;
DEFINE FIELD notes ON TABLE booking TYPE option<string>;
DEFINE FIELD created_at ON TABLE booking TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE booking TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_booking_room ON TABLE booking COLUMNS room_id;
DEFINE INDEX idx_booking_check_in ON TABLE booking COLUMNS check_in;
DEFINE INDEX idx_booking_check_out ON TABLE booking COLUMNS check_out;
DEFINE INDEX idx_booking_status ON TABLE booking COLUMNS status;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['admin', 'staff'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD remember_me ON TABLE session TYPE bool DEFAULT false;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;

-- =======================================================================
-- Audit Log (append-only; delete stays open for retention cleanup)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete FULL;
DEFINE FIELD user_id ON TABLE audit_log TYPE string;
DEFINE FIELD user_name ON TABLE audit_log TYPE string;
DEFINE FIELD action ON TABLE audit_log TYPE string;
DEFINE FIELD entity_type ON TABLE audit_log TYPE option<string>;
DEFINE FIELD entity_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD details ON TABLE audit_log TYPE option<string>;
DEFINE FIELD timestamp ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_user ON TABLE audit_log COLUMNS user_id;
DEFINE INDEX idx_audit_action ON TABLE audit_log COLUMNS action;
DEFINE INDEX idx_audit_time ON TABLE audit_log COLUMNS timestamp;

-- =======================================================================
-- Settings (single fixed-key record)
-- =======================================================================
DEFINE TABLE settings SCHEMAFULL;
DEFINE FIELD theme ON TABLE settings TYPE string \
    ASSERT $value IN ['light', 'dark', 'system'];
DEFINE FIELD updated_at ON TABLE settings TYPE datetime \
    DEFAULT time::now();
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory instances that bypass the
/// migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
