use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracker_core::SlotStore;
use tracing::debug;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./data/demo.db";

/// SQLite-backed local slot storage, one row per key.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSummary {
    pub key: String,
    pub bytes: usize,
    pub updated_at: String,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn load_slot(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT slot_value FROM local_slots WHERE slot_key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    pub async fn store_slot(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO local_slots (slot_key, slot_value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
             ON CONFLICT(slot_key) DO UPDATE SET slot_value = excluded.slot_value, updated_at = CURRENT_TIMESTAMP",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        debug!(key, bytes = value.len(), "stored slot");
        Ok(())
    }

    /// Removes a slot outright. Returns whether anything was there.
    pub async fn clear_slot(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM local_slots WHERE slot_key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_slots(&self) -> Result<Vec<SlotSummary>> {
        let rows = sqlx::query(
            "SELECT slot_key, length(CAST(slot_value AS BLOB)), updated_at FROM local_slots ORDER BY slot_key",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| SlotSummary {
                key: row.get::<String, _>(0),
                bytes: row.get::<i64, _>(1).max(0) as usize,
                updated_at: row.get::<String, _>(2),
            })
            .collect())
    }
}

/// Turns plain file paths and `sqlite:` shorthands into `sqlite://` urls.
/// Blank input falls back to [`DEFAULT_DATABASE_URL`].
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with("sqlite::memory:") || raw_database_url.contains("://") {
        return raw_database_url.to_string();
    }

    let path = raw_database_url.strip_prefix("sqlite:").unwrap_or(raw_database_url);
    format!("sqlite://{}", path.replace('\\', "/"))
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[async_trait]
impl SlotStore for Storage {
    async fn read_slot(&self, key: &str) -> Result<Option<String>> {
        self.load_slot(key).await
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.store_slot(key, value).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
