//! Innkeep Database — embedded SurrealDB connection management and
//! repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbConfig`], [`DbManager`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Repository implementations for the `innkeep-core` traits
//! - Bulk export/import and data reset ([`transfer`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;
pub mod transfer;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
