//! SurrealDB implementation of [`SettingsRepository`].
//!
//! Settings live in a single record under the fixed key
//! [`SETTINGS_ID`]; `get` creates it with defaults on first access.

use chrono::{DateTime, Utc};
use innkeep_core::error::InnkeepResult;
use innkeep_core::models::settings::{SETTINGS_ID, Settings, Theme, UpdateSettings};
use innkeep_core::repository::SettingsRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
pub(crate) struct SettingsRow {
    theme: String,
    updated_at: DateTime<Utc>,
}

pub(crate) fn parse_theme(s: &str) -> Result<Theme, DbError> {
    match s {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        "system" => Ok(Theme::System),
        other => Err(DbError::Migration(format!("unknown theme: {other}"))),
    }
}

impl SettingsRow {
    pub(crate) fn into_settings(self) -> Result<Settings, DbError> {
        Ok(Settings {
            id: SETTINGS_ID.into(),
            theme: parse_theme(&self.theme)?,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Settings repository.
#[derive(Clone)]
pub struct SurrealSettingsRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSettingsRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SettingsRepository for SurrealSettingsRepository<C> {
    async fn get(&self) -> InnkeepResult<Settings> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('settings', $id)")
            .bind(("id", SETTINGS_ID.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SettingsRow> = result.take(0).map_err(DbError::from)?;
        if let Some(row) = rows.into_iter().next() {
            return Ok(row.into_settings()?);
        }

        // First access: create the record with defaults.
        let result = self
            .db
            .query("CREATE type::record('settings', $id) SET theme = $theme")
            .bind(("id", SETTINGS_ID.to_string()))
            .bind(("theme", Theme::System.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<SettingsRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "settings".into(),
            id: SETTINGS_ID.into(),
        })?;

        Ok(row.into_settings()?)
    }

    async fn update(&self, input: UpdateSettings) -> InnkeepResult<Settings> {
        // Ensure the record exists before updating it.
        self.get().await?;

        let mut sets = Vec::new();
        if input.theme.is_some() {
            sets.push("theme = $theme");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('settings', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", SETTINGS_ID.to_string()));

        if let Some(theme) = input.theme {
            builder = builder.bind(("theme", theme.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<SettingsRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "settings".into(),
            id: SETTINGS_ID.into(),
        })?;

        Ok(row.into_settings()?)
    }
}
