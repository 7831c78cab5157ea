//! SurrealDB repository implementations.

pub(crate) mod audit;
pub(crate) mod booking;
pub(crate) mod room;
pub(crate) mod session;
pub(crate) mod settings;
pub(crate) mod user;

pub use audit::SurrealAuditLogRepository;
pub use booking::SurrealBookingRepository;
pub use room::SurrealRoomRepository;
pub use session::SurrealSessionRepository;
pub use settings::SurrealSettingsRepository;
pub use user::{SurrealUserRepository, hash_password, verify_password};
