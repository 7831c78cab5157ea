//! Embedded SurrealDB connection management.
//!
//! The store is a local single-process database: RocksDB on disk for
//! the application, in-memory for tests.

use std::path::PathBuf;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};
use tracing::info;

/// Configuration for opening the embedded store.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// On-disk location of the RocksDB store.
    pub path: PathBuf,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: "innkeep.db".into(),
            namespace: "innkeep".into(),
            database: "hotel".into(),
        }
    }
}

/// Manages the embedded SurrealDB instance.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Db>,
}

impl DbManager {
    /// Open (or create) the on-disk store at the configured path and
    /// select the configured namespace and database.
    pub async fn open(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            path = %config.path.display(),
            namespace = %config.namespace,
            database = %config.database,
            "Opening embedded store"
        );

        let db = Surreal::new::<RocksDb>(config.path.as_path()).await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        Ok(Self { db })
    }

    /// Open a fresh in-memory store. Used by tests and throwaway runs.
    pub async fn in_memory() -> Result<Self, surrealdb::Error> {
        let db = Surreal::new::<Mem>(()).await?;
        db.use_ns("innkeep").use_db("hotel").await?;
        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Db> {
        &self.db
    }
}
