//! Integration tests for bulk export/import and reset.

use chrono::{DateTime, Duration, TimeZone, Utc};
use innkeep_core::InnkeepError;
use innkeep_core::models::audit::CreateAuditLogEntry;
use innkeep_core::models::booking::{BookingStatus, NewBooking, PaymentStatus};
use innkeep_core::models::room::{CreateRoom, RoomStatus, RoomType};
use innkeep_core::models::user::{CreateUser, UserRole};
use innkeep_core::repository::{
    AuditLogRepository, BookingRepository, RoomRepository, SettingsRepository, UserRepository,
};
use innkeep_db::repository::{
    SurrealAuditLogRepository, SurrealBookingRepository, SurrealRoomRepository,
    SurrealSettingsRepository, SurrealUserRepository,
};
use innkeep_db::transfer;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    innkeep_db::run_migrations(&db).await.unwrap();
    db
}

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

/// Populate the store with one record per table.
async fn seed(db: &Surreal<surrealdb::engine::local::Db>) {
    let user_repo = SurrealUserRepository::new(db.clone());
    let room_repo = SurrealRoomRepository::new(db.clone());
    let booking_repo = SurrealBookingRepository::new(db.clone());
    let audit_repo = SurrealAuditLogRepository::new(db.clone());
    let settings_repo = SurrealSettingsRepository::new(db.clone());

    let user = user_repo
        .create(CreateUser {
            email: "admin@example.com".into(),
            password: "Admin123!".into(),
            name: "Admin".into(),
            role: UserRole::Admin,
        })
        .await
        .unwrap();

    let room = room_repo
        .create(CreateRoom {
            room_number: "101".into(),
            room_type: RoomType::Single,
            capacity: 1,
            price_per_night: 100.0,
            status: RoomStatus::Available,
            amenities: vec!["WiFi".into()],
            notes: None,
        })
        .await
        .unwrap();

    booking_repo
        .create(NewBooking {
            guest_name: "John Smith".into(),
            guest_contact: "+1-555-0101".into(),
            room_id: room.id,
            check_in: day(0),
            check_out: day(3),
            status: BookingStatus::Reserved,
            payment_status: PaymentStatus::Unpaid,
            total_cost: 300.0,
            paid_amount: 0.0,
            notes: None,
        })
        .await
        .unwrap();

    audit_repo
        .append(CreateAuditLogEntry {
            user_id: user.id,
            user_name: user.name.clone(),
            action: "booking_created".into(),
            entity_type: Some("booking".into()),
            entity_id: None,
            details: None,
        })
        .await
        .unwrap();

    // Materialize the default settings record.
    settings_repo.get().await.unwrap();
}

#[tokio::test]
async fn export_round_trips_through_import() {
    let db = setup().await;
    seed(&db).await;

    let room_repo = SurrealRoomRepository::new(db.clone());
    let booking_repo = SurrealBookingRepository::new(db.clone());
    let user_repo = SurrealUserRepository::new(db.clone());

    let before_rooms = room_repo.list().await.unwrap();
    let before_bookings = booking_repo.list().await.unwrap();
    let before_users = user_repo.list().await.unwrap();

    let json = transfer::export_json(&db).await.unwrap();

    // Wire format: top-level camelCase keys.
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("auditLogs").is_some());
    assert!(value.get("exportedAt").is_some());
    assert!(value.get("users").is_some());

    // Import into a fresh store.
    let other = setup().await;
    transfer::import_json(&other, &json).await.unwrap();

    let after_rooms = SurrealRoomRepository::new(other.clone()).list().await.unwrap();
    let after_bookings = SurrealBookingRepository::new(other.clone())
        .list()
        .await
        .unwrap();
    let after_users = SurrealUserRepository::new(other.clone()).list().await.unwrap();

    assert_eq!(after_rooms.len(), before_rooms.len());
    assert_eq!(after_bookings.len(), before_bookings.len());
    assert_eq!(after_users.len(), before_users.len());

    // Record ids and derived fields survive the round trip.
    assert_eq!(after_rooms[0].id, before_rooms[0].id);
    assert_eq!(after_bookings[0].id, before_bookings[0].id);
    assert_eq!(after_bookings[0].total_cost, before_bookings[0].total_cost);
    assert_eq!(after_users[0].id, before_users[0].id);
    assert_eq!(after_users[0].password_hash, before_users[0].password_hash);
}

#[tokio::test]
async fn import_replaces_existing_contents() {
    let db = setup().await;
    seed(&db).await;
    let json = transfer::export_json(&db).await.unwrap();

    // A second store with different data.
    let other = setup().await;
    let other_rooms = SurrealRoomRepository::new(other.clone());
    other_rooms
        .create(CreateRoom {
            room_number: "999".into(),
            room_type: RoomType::Deluxe,
            capacity: 6,
            price_per_night: 500.0,
            status: RoomStatus::Available,
            amenities: vec![],
            notes: None,
        })
        .await
        .unwrap();

    transfer::import_json(&other, &json).await.unwrap();

    let rooms = other_rooms.list().await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].room_number, "101");
}

#[tokio::test]
async fn import_rejects_invalid_json() {
    let db = setup().await;

    let err = transfer::import_json(&db, "definitely not json").await.unwrap_err();
    assert!(matches!(err, InnkeepError::InvalidImport { .. }));
}

#[tokio::test]
async fn import_rejects_missing_array_fields() {
    let db = setup().await;

    // Valid JSON, but the bookings array is absent.
    let doc = r#"{"users": [], "rooms": [], "settings": [], "auditLogs": [], "exportedAt": "2025-06-01T00:00:00Z"}"#;
    let err = transfer::import_json(&db, doc).await.unwrap_err();
    assert!(
        matches!(err, InnkeepError::InvalidImport { ref message } if message.contains("bookings")),
        "expected InvalidImport mentioning bookings, got: {err:?}"
    );
}

#[tokio::test]
async fn import_failure_leaves_store_untouched() {
    let db = setup().await;
    seed(&db).await;

    let err = transfer::import_json(&db, "{}").await.unwrap_err();
    assert!(matches!(err, InnkeepError::InvalidImport { .. }));

    // Parsing happens before anything is cleared.
    let rooms = SurrealRoomRepository::new(db.clone()).list().await.unwrap();
    assert_eq!(rooms.len(), 1);
}

#[tokio::test]
async fn reset_clears_everything_but_settings() {
    let db = setup().await;
    seed(&db).await;

    transfer::reset_all(&db).await.unwrap();

    assert!(SurrealRoomRepository::new(db.clone()).list().await.unwrap().is_empty());
    assert!(SurrealBookingRepository::new(db.clone()).list().await.unwrap().is_empty());
    assert_eq!(SurrealUserRepository::new(db.clone()).count().await.unwrap(), 0);
    assert!(
        SurrealAuditLogRepository::new(db.clone())
            .list_recent(10)
            .await
            .unwrap()
            .is_empty()
    );

    // Settings survive.
    let settings = SurrealSettingsRepository::new(db.clone()).get().await.unwrap();
    assert_eq!(settings.id, "app-settings");
}
