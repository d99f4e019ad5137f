//! ABOUTME: SQL persistence backend over a single key/value table
//! ABOUTME: sqlx query style: CREATE TABLE IF NOT EXISTS, upsert via ON CONFLICT

use super::PersistenceBackend;
use async_trait::async_trait;
use schedkit_core::Result;
use serde_json::Value;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

/// Stores the job map in a single `kv` table, one row per job id,
/// the record itself kept as a JSON-text column. Unlike the teacher's
/// multi-table job/execution schema, a job scheduler that only needs
/// to round-trip its own JSON records has no use for a relational
/// shape beyond key/value.
pub struct SqlBackend {
    pool: SqlitePool,
}

impl SqlBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the backing table if it does not already exist.
    pub async fn migrate(&self) -> Result<()> {
        debug!("running scheduler persistence migrations");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| schedkit_core::Error::Database(format!("failed to create kv table: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl PersistenceBackend for SqlBackend {
    async fn load(&self) -> Result<HashMap<String, Value>> {
        let rows = sqlx::query("SELECT key, value FROM kv")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| schedkit_core::Error::Database(format!("failed to load kv rows: {e}")))?;

        let mut out = HashMap::new();
        for row in rows {
            let key: String = row.get("key");
            let value_text: String = row.get("value");
            let value: Value = serde_json::from_str(&value_text).map_err(|e| {
                schedkit_core::Error::Validation(format!("corrupt kv row for {key}: {e}"))
            })?;
            out.insert(key, value);
        }
        Ok(out)
    }

    async fn save(&self, data: &HashMap<String, Value>) -> Result<()> {
        for (key, value) in data {
            self.save_one(key, value.clone()).await?;
        }
        Ok(())
    }

    async fn load_one(&self, job_id: &str) -> Result<Option<Value>> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| schedkit_core::Error::Database(format!("failed to load kv row: {e}")))?;

        match row {
            Some(row) => {
                let value_text: String = row.get("value");
                let value = serde_json::from_str(&value_text).map_err(|e| {
                    schedkit_core::Error::Validation(format!("corrupt kv row for {job_id}: {e}"))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn save_one(&self, job_id: &str, entry: Value) -> Result<()> {
        let value_text = serde_json::to_string(&entry)
            .map_err(|e| schedkit_core::Error::Validation(format!("failed to serialize entry: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO kv (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(job_id)
        .bind(value_text)
        .execute(&self.pool)
        .await
        .map_err(|e| schedkit_core::Error::Database(format!("failed to upsert kv row: {e}")))?;
        Ok(())
    }
}
