//! Integration tests for the booking lifecycle service against
//! in-memory SurrealDB.

use chrono::{DateTime, Duration, TimeZone, Utc};
use innkeep_booking::{BookingService, CreateBookingInput, UpdateBookingInput, WriteLock};
use innkeep_core::InnkeepError;
use innkeep_core::models::booking::{BookingStatus, PaymentStatus};
use innkeep_core::models::room::{CreateRoom, Room, RoomStatus, RoomType};
use innkeep_core::repository::{BookingRepository, RoomRepository};
use innkeep_db::repository::{SurrealBookingRepository, SurrealRoomRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type Service = BookingService<SurrealRoomRepository<Db>, SurrealBookingRepository<Db>>;

/// Helper: in-memory DB, migrations, service wired to shared repos.
async fn setup() -> (Service, SurrealRoomRepository<Db>, SurrealBookingRepository<Db>) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    innkeep_db::run_migrations(&db).await.unwrap();

    let room_repo = SurrealRoomRepository::new(db.clone());
    let booking_repo = SurrealBookingRepository::new(db.clone());
    let service = BookingService::new(room_repo.clone(), booking_repo.clone(), WriteLock::new());

    (service, room_repo, booking_repo)
}

fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap() + Duration::days(n)
}

async fn make_room(repo: &SurrealRoomRepository<Db>, number: &str, price: f64) -> Room {
    repo.create(CreateRoom {
        room_number: number.into(),
        room_type: RoomType::Double,
        capacity: 2,
        price_per_night: price,
        status: RoomStatus::Available,
        amenities: vec![],
        notes: None,
    })
    .await
    .unwrap()
}

fn reservation(room_id: Uuid, from: i64, to: i64) -> CreateBookingInput {
    CreateBookingInput {
        guest_name: "Emily Johnson".into(),
        guest_contact: "+1-555-0102".into(),
        room_id,
        check_in: day(from),
        check_out: day(to),
        status: BookingStatus::Reserved,
        payment_status: PaymentStatus::Unpaid,
        paid_amount: 0.0,
        notes: None,
    }
}

#[tokio::test]
async fn create_computes_total_cost_from_nights_and_price() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 0, 2))
        .await
        .unwrap();

    assert_eq!(booking.total_cost, 300.0);
    assert_eq!(booking.status, BookingStatus::Reserved);
}

#[tokio::test]
async fn create_rejects_inverted_or_empty_date_range() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let err = service
        .create_booking(reservation(room.id, 3, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, InnkeepError::Validation { .. }));

    let err = service
        .create_booking(reservation(room.id, 3, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, InnkeepError::Validation { .. }));
}

#[tokio::test]
async fn create_rejects_unknown_room() {
    let (service, _, _) = setup().await;

    let err = service
        .create_booking(reservation(Uuid::new_v4(), 0, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, InnkeepError::NotFound { .. }));
}

#[tokio::test]
async fn create_rejects_terminal_initial_status() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let err = service
        .create_booking(CreateBookingInput {
            status: BookingStatus::CheckedOut,
            ..reservation(room.id, 0, 2)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, InnkeepError::Validation { .. }));
}

#[tokio::test]
async fn overlapping_booking_rejected_and_adjacent_accepted() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();

    // [1, 2) is contained in [0, 3).
    let err = service
        .create_booking(reservation(room.id, 1, 2))
        .await
        .unwrap_err();
    assert!(
        matches!(err, InnkeepError::RoomUnavailable { room_id } if room_id == room.id),
        "expected RoomUnavailable, got: {err:?}"
    );

    // [3, 5) only touches the boundary of [0, 3) — back-to-back is fine.
    service
        .create_booking(reservation(room.id, 3, 5))
        .await
        .unwrap();
}

#[tokio::test]
async fn bookings_on_other_rooms_do_not_conflict() {
    let (service, room_repo, _) = setup().await;
    let room_a = make_room(&room_repo, "201", 150.0).await;
    let room_b = make_room(&room_repo, "202", 150.0).await;

    service
        .create_booking(reservation(room_a.id, 0, 3))
        .await
        .unwrap();
    service
        .create_booking(reservation(room_b.id, 0, 3))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_booking_releases_its_dates() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();
    service.cancel(booking.id).await.unwrap();

    service
        .create_booking(reservation(room.id, 1, 2))
        .await
        .unwrap();
}

#[tokio::test]
async fn walk_in_create_marks_room_occupied() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(CreateBookingInput {
            status: BookingStatus::CheckedIn,
            ..reservation(room.id, 0, 3)
        })
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::CheckedIn);
    let room = room_repo.get_by_id(room.id).await.unwrap();
    assert_eq!(room.status, RoomStatus::Occupied);
}

#[tokio::test]
async fn check_in_then_check_out_keeps_room_status_in_sync() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();
    assert_eq!(
        room_repo.get_by_id(room.id).await.unwrap().status,
        RoomStatus::Available
    );

    let checked_in = service.check_in(booking.id).await.unwrap();
    assert_eq!(checked_in.status, BookingStatus::CheckedIn);
    assert_eq!(
        room_repo.get_by_id(room.id).await.unwrap().status,
        RoomStatus::Occupied
    );

    let checked_out = service.check_out(booking.id).await.unwrap();
    assert_eq!(checked_out.status, BookingStatus::CheckedOut);
    assert_eq!(
        room_repo.get_by_id(room.id).await.unwrap().status,
        RoomStatus::Available
    );
}

#[tokio::test]
async fn check_in_requires_reserved_status() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();
    service.cancel(booking.id).await.unwrap();

    let err = service.check_in(booking.id).await.unwrap_err();
    assert!(
        matches!(
            err,
            InnkeepError::InvalidTransition {
                current: BookingStatus::Cancelled,
                requested: BookingStatus::CheckedIn,
            }
        ),
        "expected InvalidTransition, got: {err:?}"
    );
}

#[tokio::test]
async fn check_out_requires_checked_in_status() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();

    let err = service.check_out(booking.id).await.unwrap_err();
    assert!(matches!(
        err,
        InnkeepError::InvalidTransition {
            current: BookingStatus::Reserved,
            requested: BookingStatus::CheckedOut,
        }
    ));
}

#[tokio::test]
async fn cancel_is_rejected_on_terminal_bookings() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();
    service.check_in(booking.id).await.unwrap();
    service.check_out(booking.id).await.unwrap();

    let err = service.cancel(booking.id).await.unwrap_err();
    assert!(matches!(
        err,
        InnkeepError::InvalidTransition {
            current: BookingStatus::CheckedOut,
            requested: BookingStatus::Cancelled,
        }
    ));
}

#[tokio::test]
async fn cancel_frees_the_room_only_after_check_in() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    // Cancelling a reservation leaves the room status alone.
    let reserved = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();
    service.cancel(reserved.id).await.unwrap();
    assert_eq!(
        room_repo.get_by_id(room.id).await.unwrap().status,
        RoomStatus::Available
    );

    // Cancelling a checked-in stay flips the room back to Available.
    let stay = service
        .create_booking(CreateBookingInput {
            status: BookingStatus::CheckedIn,
            ..reservation(room.id, 0, 3)
        })
        .await
        .unwrap();
    assert_eq!(
        room_repo.get_by_id(room.id).await.unwrap().status,
        RoomStatus::Occupied
    );

    let cancelled = service.cancel(stay.id).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(
        room_repo.get_by_id(room.id).await.unwrap().status,
        RoomStatus::Available
    );
}

#[tokio::test]
async fn update_checks_conflicts_excluding_itself() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();
    service
        .create_booking(reservation(room.id, 5, 7))
        .await
        .unwrap();

    // Shrinking inside its own range only "conflicts" with itself.
    let updated = service
        .update_booking(
            booking.id,
            UpdateBookingInput {
                check_in: Some(day(1)),
                check_out: Some(day(2)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.check_in, day(1));
    assert_eq!(updated.total_cost, 150.0);

    // Extending into the other booking's range is a conflict.
    let err = service
        .update_booking(
            booking.id,
            UpdateBookingInput {
                check_out: Some(day(6)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InnkeepError::RoomUnavailable { .. }));
}

#[tokio::test]
async fn update_recomputes_cost_when_room_changes() {
    let (service, room_repo, _) = setup().await;
    let cheap = make_room(&room_repo, "201", 100.0).await;
    let pricey = make_room(&room_repo, "401", 500.0).await;

    let booking = service
        .create_booking(reservation(cheap.id, 0, 2))
        .await
        .unwrap();
    assert_eq!(booking.total_cost, 200.0);

    let moved = service
        .update_booking(
            booking.id,
            UpdateBookingInput {
                room_id: Some(pricey.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.room_id, pricey.id);
    assert_eq!(moved.total_cost, 1000.0);
}

#[tokio::test]
async fn update_guest_fields_keeps_cost() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 0, 2))
        .await
        .unwrap();

    let updated = service
        .update_booking(
            booking.id,
            UpdateBookingInput {
                guest_name: Some("Michael Brown".into()),
                payment_status: Some(PaymentStatus::Paid),
                paid_amount: Some(300.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.guest_name, "Michael Brown");
    assert_eq!(updated.payment_status, PaymentStatus::Paid);
    assert_eq!(updated.paid_amount, 300.0);
    assert_eq!(updated.total_cost, 300.0); // untouched
}

#[tokio::test]
async fn update_rejects_inverted_merged_dates() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let booking = service
        .create_booking(reservation(room.id, 2, 4))
        .await
        .unwrap();

    // New check-in after the existing check-out.
    let err = service
        .update_booking(
            booking.id,
            UpdateBookingInput {
                check_in: Some(day(5)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, InnkeepError::Validation { .. }));
}

#[tokio::test]
async fn overlapping_bookings_reports_only_active_conflicts() {
    let (service, room_repo, _) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    let kept = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();
    let cancelled = service
        .create_booking(reservation(room.id, 3, 6))
        .await
        .unwrap();
    service.cancel(cancelled.id).await.unwrap();

    let hits = service
        .overlapping_bookings(room.id, day(0), day(10), None)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, kept.id);

    let excluding_self = service
        .overlapping_bookings(room.id, day(0), day(10), Some(kept.id))
        .await
        .unwrap();
    assert!(excluding_self.is_empty());
}

#[tokio::test]
async fn active_bookings_on_a_room_never_overlap() {
    let (service, room_repo, booking_repo) = setup().await;
    let room = make_room(&room_repo, "201", 150.0).await;

    // A busy sequence of creates, cancellations, and updates.
    let a = service
        .create_booking(reservation(room.id, 0, 3))
        .await
        .unwrap();
    let b = service
        .create_booking(reservation(room.id, 3, 6))
        .await
        .unwrap();
    service.cancel(b.id).await.unwrap();
    service
        .create_booking(reservation(room.id, 4, 8))
        .await
        .unwrap();
    service
        .update_booking(
            a.id,
            UpdateBookingInput {
                check_out: Some(day(4)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(
        service
            .create_booking(reservation(room.id, 2, 5))
            .await
            .is_err()
    );

    let active: Vec<_> = booking_repo
        .list_by_room(room.id)
        .await
        .unwrap()
        .into_iter()
        .filter(|b| b.is_active())
        .collect();

    for (i, left) in active.iter().enumerate() {
        for right in active.iter().skip(i + 1) {
            assert!(
                left.check_out <= right.check_in || right.check_out <= left.check_in,
                "active bookings overlap: [{}, {}) vs [{}, {})",
                left.check_in,
                left.check_out,
                right.check_in,
                right.check_out
            );
        }
    }
}

#[tokio::test]
async fn today_and_upcoming_queries_follow_status() {
    let (service, room_repo, _) = setup().await;
    let room_a = make_room(&room_repo, "201", 150.0).await;
    let room_b = make_room(&room_repo, "202", 150.0).await;

    let now = Utc::now();

    // Arriving today, still reserved.
    let arriving = service
        .create_booking(CreateBookingInput {
            check_in: now,
            check_out: now + Duration::days(2),
            ..reservation(room_a.id, 0, 0)
        })
        .await
        .unwrap();

    // Departing today, currently checked in.
    let departing = service
        .create_booking(CreateBookingInput {
            check_in: now - Duration::days(1),
            check_out: now,
            status: BookingStatus::CheckedIn,
            ..reservation(room_b.id, 0, 0)
        })
        .await
        .unwrap();

    // Arriving in two days — shares only a boundary with `arriving`.
    let future = service
        .create_booking(CreateBookingInput {
            check_in: now + Duration::days(2),
            check_out: now + Duration::days(4),
            ..reservation(room_a.id, 0, 0)
        })
        .await
        .unwrap();

    let check_ins = service.today_check_ins().await.unwrap();
    assert!(check_ins.iter().any(|b| b.id == arriving.id));
    assert!(check_ins.iter().all(|b| b.status == BookingStatus::Reserved));

    let check_outs = service.today_check_outs().await.unwrap();
    assert!(check_outs.iter().any(|b| b.id == departing.id));

    let upcoming = service.upcoming_bookings(7).await.unwrap();
    assert!(upcoming.iter().any(|b| b.id == future.id));
}
