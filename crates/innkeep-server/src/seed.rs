//! First-run seeding — a default admin/staff pair, a floor of sample
//! rooms, and a handful of bookings.
//!
//! Rooms and bookings go through the services, so every seeded record
//! passes the same validation and conflict checks as live data.

use chrono::{Duration, NaiveTime, Utc};
use innkeep_booking::{BookingService, CreateBookingInput, RoomService, WriteLock};
use innkeep_core::error::InnkeepResult;
use innkeep_core::models::booking::{BookingStatus, PaymentStatus};
use innkeep_core::models::room::{CreateRoom, Room, RoomStatus, RoomType};
use innkeep_core::models::user::{CreateUser, UserRole};
use innkeep_core::repository::UserRepository;
use innkeep_db::repository::{
    SurrealBookingRepository, SurrealRoomRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tracing::info;

/// Seed the store unless users already exist.
pub async fn seed_if_empty(db: &Surreal<Db>) -> InnkeepResult<bool> {
    let user_repo = SurrealUserRepository::new(db.clone());
    if user_repo.count().await? > 0 {
        return Ok(false);
    }

    seed(db).await?;
    Ok(true)
}

async fn seed(db: &Surreal<Db>) -> InnkeepResult<()> {
    let user_repo = SurrealUserRepository::new(db.clone());
    let room_repo = SurrealRoomRepository::new(db.clone());
    let booking_repo = SurrealBookingRepository::new(db.clone());

    let guard = WriteLock::new();
    let rooms = RoomService::new(room_repo.clone(), booking_repo.clone(), guard.clone());
    let bookings = BookingService::new(room_repo, booking_repo, guard);

    user_repo
        .create(CreateUser {
            email: "admin@example.com".into(),
            password: "Admin123!".into(),
            name: "Admin User".into(),
            role: UserRole::Admin,
        })
        .await?;
    user_repo
        .create(CreateUser {
            email: "staff@example.com".into(),
            password: "Staff123!".into(),
            name: "Staff User".into(),
            role: UserRole::Staff,
        })
        .await?;

    let created = seed_rooms(&rooms).await?;

    let today = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    let day = |n: i64| today + Duration::days(n);

    // Walk-in currently staying in room 101.
    bookings
        .create_booking(CreateBookingInput {
            guest_name: "John Smith".into(),
            guest_contact: "+1-555-0101".into(),
            room_id: created[0].id,
            check_in: day(0),
            check_out: day(3),
            status: BookingStatus::CheckedIn,
            payment_status: PaymentStatus::Paid,
            paid_amount: 300.0,
            notes: Some("Early check-in requested".into()),
        })
        .await?;

    bookings
        .create_booking(CreateBookingInput {
            guest_name: "Emily Johnson".into(),
            guest_contact: "+1-555-0102".into(),
            room_id: created[2].id,
            check_in: day(1),
            check_out: day(4),
            status: BookingStatus::Reserved,
            payment_status: PaymentStatus::Partial,
            paid_amount: 150.0,
            notes: Some("Honeymoon package".into()),
        })
        .await?;

    bookings
        .create_booking(CreateBookingInput {
            guest_name: "Michael Brown".into(),
            guest_contact: "+1-555-0103".into(),
            room_id: created[5].id,
            check_in: day(2),
            check_out: day(7),
            status: BookingStatus::Reserved,
            payment_status: PaymentStatus::Unpaid,
            paid_amount: 0.0,
            notes: Some("Business trip - invoice to company".into()),
        })
        .await?;

    bookings
        .create_booking(CreateBookingInput {
            guest_name: "Sarah Davis".into(),
            guest_contact: "+1-555-0104".into(),
            room_id: created[7].id,
            check_in: day(5),
            check_out: day(10),
            status: BookingStatus::Reserved,
            payment_status: PaymentStatus::Paid,
            paid_amount: 2500.0,
            notes: Some("Anniversary celebration - arrange flowers and champagne".into()),
        })
        .await?;

    info!(rooms = created.len(), "Seeded sample data");
    Ok(())
}

async fn seed_rooms<R, B>(rooms: &RoomService<R, B>) -> InnkeepResult<Vec<Room>>
where
    R: innkeep_core::repository::RoomRepository,
    B: innkeep_core::repository::BookingRepository,
{
    let base = |number: &str, room_type, capacity, price| CreateRoom {
        room_number: number.into(),
        room_type,
        capacity,
        price_per_night: price,
        status: RoomStatus::Available,
        amenities: vec![
            "WiFi".into(),
            "TV".into(),
            "Air Conditioning".into(),
            "Bathroom".into(),
        ],
        notes: None,
    };

    let inputs = vec![
        CreateRoom {
            notes: Some("Cozy single room perfect for solo travelers".into()),
            ..base("101", RoomType::Single, 1, 100.0)
        },
        base("102", RoomType::Single, 1, 100.0),
        CreateRoom {
            notes: Some("Spacious double room with queen bed".into()),
            ..base("201", RoomType::Double, 2, 150.0)
        },
        base("202", RoomType::Double, 2, 150.0),
        CreateRoom {
            status: RoomStatus::Maintenance,
            notes: Some("Under maintenance - AC repair".into()),
            ..base("203", RoomType::Double, 2, 160.0)
        },
        CreateRoom {
            notes: Some("Luxury suite with ocean view".into()),
            ..base("301", RoomType::Suite, 4, 300.0)
        },
        base("302", RoomType::Suite, 4, 300.0),
        CreateRoom {
            notes: Some("Premium deluxe suite with panoramic ocean view".into()),
            ..base("401", RoomType::Deluxe, 6, 500.0)
        },
    ];

    let mut created = Vec::with_capacity(inputs.len());
    for input in inputs {
        created.push(rooms.create_room(input).await?);
    }
    Ok(created)
}
