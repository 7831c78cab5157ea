//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! The table is append-only; the single mutation besides `append` is
//! the retention sweep in [`clear_older_than`].
//!
//! [`clear_older_than`]: innkeep_core::repository::AuditLogRepository::clear_older_than

use chrono::{DateTime, Utc};
use innkeep_core::error::InnkeepResult;
use innkeep_core::models::audit::{AuditLogEntry, CreateAuditLogEntry};
use innkeep_core::repository::AuditLogRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    user_id: String,
    user_name: String,
    action: String,
    entity_type: Option<String>,
    entity_id: Option<String>,
    details: Option<String>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
pub(crate) struct AuditRowWithId {
    record_id: String,
    user_id: String,
    user_name: String,
    action: String,
    entity_type: Option<String>,
    entity_id: Option<String>,
    details: Option<String>,
    timestamp: DateTime<Utc>,
}

fn row_to_entry(row: AuditRow, id: Uuid) -> Result<AuditLogEntry, DbError> {
    let user_id = Uuid::parse_str(&row.user_id)
        .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
    Ok(AuditLogEntry {
        id,
        user_id,
        user_name: row.user_name,
        action: row.action,
        entity_type: row.entity_type,
        entity_id: row.entity_id,
        details: row.details,
        timestamp: row.timestamp,
    })
}

impl AuditRowWithId {
    pub(crate) fn try_into_entry(self) -> Result<AuditLogEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        Ok(AuditLogEntry {
            id,
            user_id,
            user_name: self.user_name,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            details: self.details,
            timestamp: self.timestamp,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn rows_to_entries(rows: Vec<AuditRowWithId>) -> Result<Vec<AuditLogEntry>, DbError> {
    rows.into_iter().map(|row| row.try_into_entry()).collect()
}

/// SurrealDB implementation of the audit log repository.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: CreateAuditLogEntry) -> InnkeepResult<AuditLogEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 user_id = $user_id, \
                 user_name = $user_name, \
                 action = $action, \
                 entity_type = $entity_type, \
                 entity_id = $entity_id, \
                 details = $details",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", input.user_id.to_string()))
            .bind(("user_name", input.user_name))
            .bind(("action", input.action))
            .bind(("entity_type", input.entity_type))
            .bind(("entity_id", input.entity_id))
            .bind(("details", input.details))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        row_to_entry(row, id).map_err(Into::into)
    }

    async fn list_recent(&self, limit: u64) -> InnkeepResult<Vec<AuditLogEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM audit_log \
                 ORDER BY timestamp DESC LIMIT $limit",
            )
            .bind(("limit", limit))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows_to_entries(rows)?)
    }

    async fn list_by_user(&self, user_id: Uuid) -> InnkeepResult<Vec<AuditLogEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM audit_log \
                 WHERE user_id = $user_id \
                 ORDER BY timestamp DESC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows_to_entries(rows)?)
    }

    async fn list_by_action(&self, action: &str) -> InnkeepResult<Vec<AuditLogEntry>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM audit_log \
                 WHERE action = $action \
                 ORDER BY timestamp DESC",
            )
            .bind(("action", action.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;
        Ok(rows_to_entries(rows)?)
    }

    async fn clear_older_than(&self, cutoff: DateTime<Utc>) -> InnkeepResult<u64> {
        // Count matching entries first, then delete.
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM audit_log \
                 WHERE timestamp < $cutoff GROUP ALL",
            )
            .bind(("cutoff", cutoff))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE audit_log WHERE timestamp < $cutoff")
            .bind(("cutoff", cutoff))
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
