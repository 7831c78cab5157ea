//! Integration tests for the Booking repository using in-memory SurrealDB.

use chrono::{DateTime, Duration, TimeZone, Utc};
use innkeep_core::InnkeepError;
use innkeep_core::models::booking::{BookingStatus, NewBooking, PaymentStatus, UpdateBooking};
use innkeep_core::repository::BookingRepository;
use innkeep_db::repository::SurrealBookingRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    innkeep_db::run_migrations(&db).await.unwrap();
    db
}

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

fn sample_booking(room_id: Uuid, from: i64, to: i64) -> NewBooking {
    NewBooking {
        guest_name: "John Smith".into(),
        guest_contact: "+1-555-0101".into(),
        room_id,
        check_in: day(from),
        check_out: day(to),
        status: BookingStatus::Reserved,
        payment_status: PaymentStatus::Unpaid,
        total_cost: 300.0,
        paid_amount: 0.0,
        notes: None,
    }
}

#[tokio::test]
async fn create_and_get_booking() {
    let db = setup().await;
    let repo = SurrealBookingRepository::new(db);
    let room_id = Uuid::new_v4();

    let booking = repo.create(sample_booking(room_id, 0, 3)).await.unwrap();

    assert_eq!(booking.guest_name, "John Smith");
    assert_eq!(booking.room_id, room_id);
    assert_eq!(booking.status, BookingStatus::Reserved);
    assert_eq!(booking.payment_status, PaymentStatus::Unpaid);
    assert_eq!(booking.total_cost, 300.0);
    assert_eq!(booking.paid_amount, 0.0);
    assert_eq!(booking.check_in, day(0));
    assert_eq!(booking.check_out, day(3));

    let fetched = repo.get_by_id(booking.id).await.unwrap();
    assert_eq!(fetched.id, booking.id);
}

#[tokio::test]
async fn list_newest_check_in_first() {
    let db = setup().await;
    let repo = SurrealBookingRepository::new(db);
    let room_id = Uuid::new_v4();

    let early = repo.create(sample_booking(room_id, 0, 2)).await.unwrap();
    let late = repo.create(sample_booking(room_id, 10, 12)).await.unwrap();

    let all = repo.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, late.id);
    assert_eq!(all[1].id, early.id);
}

#[tokio::test]
async fn list_by_room_only_returns_that_room() {
    let db = setup().await;
    let repo = SurrealBookingRepository::new(db);
    let room_a = Uuid::new_v4();
    let room_b = Uuid::new_v4();

    repo.create(sample_booking(room_a, 0, 2)).await.unwrap();
    repo.create(sample_booking(room_a, 5, 7)).await.unwrap();
    repo.create(sample_booking(room_b, 0, 2)).await.unwrap();

    let for_a = repo.list_by_room(room_a).await.unwrap();
    assert_eq!(for_a.len(), 2);
    assert!(for_a.iter().all(|b| b.room_id == room_a));
}

#[tokio::test]
async fn check_in_range_query() {
    let db = setup().await;
    let repo = SurrealBookingRepository::new(db);
    let room_id = Uuid::new_v4();

    repo.create(sample_booking(room_id, 0, 2)).await.unwrap();
    let inside = repo.create(sample_booking(room_id, 5, 7)).await.unwrap();
    repo.create(sample_booking(room_id, 20, 22)).await.unwrap();

    let hits = repo.list_checking_in_between(day(4), day(10)).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, inside.id);

    // The upper bound is exclusive.
    let edge = repo.list_checking_in_between(day(4), day(5)).await.unwrap();
    assert!(edge.is_empty());
}

#[tokio::test]
async fn check_out_range_query() {
    let db = setup().await;
    let repo = SurrealBookingRepository::new(db);
    let room_id = Uuid::new_v4();

    repo.create(sample_booking(room_id, 0, 2)).await.unwrap();
    let inside = repo.create(sample_booking(room_id, 5, 7)).await.unwrap();

    let hits = repo
        .list_checking_out_between(day(6), day(8))
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, inside.id);
}

#[tokio::test]
async fn update_booking_fields() {
    let db = setup().await;
    let repo = SurrealBookingRepository::new(db);
    let room_id = Uuid::new_v4();

    let booking = repo.create(sample_booking(room_id, 0, 3)).await.unwrap();

    let updated = repo
        .update(
            booking.id,
            UpdateBooking {
                status: Some(BookingStatus::CheckedIn),
                payment_status: Some(PaymentStatus::Partial),
                paid_amount: Some(100.0),
                notes: Some(Some("early arrival".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, BookingStatus::CheckedIn);
    assert_eq!(updated.payment_status, PaymentStatus::Partial);
    assert_eq!(updated.paid_amount, 100.0);
    assert_eq!(updated.notes.as_deref(), Some("early arrival"));
    assert_eq!(updated.guest_name, "John Smith"); // unchanged
}

#[tokio::test]
async fn delete_booking() {
    let db = setup().await;
    let repo = SurrealBookingRepository::new(db);
    let room_id = Uuid::new_v4();

    let booking = repo.create(sample_booking(room_id, 0, 3)).await.unwrap();
    repo.delete(booking.id).await.unwrap();

    let err = repo.get_by_id(booking.id).await.unwrap_err();
    assert!(matches!(err, InnkeepError::NotFound { .. }));
}
