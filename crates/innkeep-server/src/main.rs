//! Innkeep Server — application entry point.
//!
//! Opens the embedded store, applies migrations, and seeds sample
//! data on first run. The presentation layer drives the services from
//! here.

use innkeep_core::repository::{BookingRepository, RoomRepository, UserRepository};
use innkeep_db::repository::{
    SurrealBookingRepository, SurrealRoomRepository, SurrealUserRepository,
};
use innkeep_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

mod seed;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("innkeep=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Innkeep...");

    let config = DbConfig {
        path: std::env::var("INNKEEP_DATA_DIR")
            .map(Into::into)
            .unwrap_or_else(|_| DbConfig::default().path),
        ..DbConfig::default()
    };

    let manager = match DbManager::open(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open the store");
            std::process::exit(1);
        }
    };
    let db = manager.client();

    if let Err(e) = innkeep_db::run_migrations(db).await {
        tracing::error!(error = %e, "Migrations failed");
        std::process::exit(1);
    }

    match seed::seed_if_empty(db).await {
        Ok(true) => tracing::info!("First run: store seeded with sample data"),
        Ok(false) => {}
        Err(e) => {
            tracing::error!(error = %e, "Seeding failed");
            std::process::exit(1);
        }
    }

    let users = SurrealUserRepository::new(db.clone());
    let rooms = SurrealRoomRepository::new(db.clone());
    let bookings = SurrealBookingRepository::new(db.clone());

    match startup_summary(&users, &rooms, &bookings).await {
        Ok((user_count, room_count, booking_count)) => {
            tracing::info!(
                users = user_count,
                rooms = room_count,
                bookings = booking_count,
                "Store ready"
            );
        }
        Err(e) => tracing::warn!(error = %e, "Could not read startup summary"),
    }

    tracing::info!("Innkeep stopped.");
}

async fn startup_summary(
    users: &SurrealUserRepository<surrealdb::engine::local::Db>,
    rooms: &SurrealRoomRepository<surrealdb::engine::local::Db>,
    bookings: &SurrealBookingRepository<surrealdb::engine::local::Db>,
) -> innkeep_core::InnkeepResult<(u64, usize, usize)> {
    let user_count = users.count().await?;
    let room_count = rooms.list().await?.len();
    let booking_count = bookings.list().await?.len();
    Ok((user_count, room_count, booking_count))
}
