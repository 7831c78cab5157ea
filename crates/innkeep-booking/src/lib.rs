//! Innkeep Booking — the booking conflict engine, the booking
//! lifecycle state machine, the room store service, and read-side
//! analytics.
//!
//! The services are generic over the `innkeep-core` repository traits
//! so this crate has no dependency on the database crate.

pub mod analytics;
pub mod bookings;
pub mod lock;
pub mod overlap;
pub mod rooms;

pub use bookings::{BookingService, CreateBookingInput, UpdateBookingInput};
pub use lock::WriteLock;
pub use rooms::RoomService;
