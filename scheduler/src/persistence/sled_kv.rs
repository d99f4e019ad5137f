//! ABOUTME: Embedded key-value persistence backend built on sled
//! ABOUTME: Grounded on persistence/shelve.py's per-key-entry semantics, without its file-lock caveats

use super::PersistenceBackend;
use async_trait::async_trait;
use schedkit_core::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Stores each job's record under its own key in an embedded sled
/// database, mirroring the one-entry-per-job-id layout a Python
/// `shelve` file gives the original implementation.
pub struct EmbeddedKvBackend {
    db: sled::Db,
}

impl EmbeddedKvBackend {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| schedkit_core::Error::Storage(format!("failed to open sled db: {e}")))?;
        Ok(Self { db })
    }
}

#[async_trait]
impl PersistenceBackend for EmbeddedKvBackend {
    async fn load(&self) -> Result<HashMap<String, Value>> {
        let mut out = HashMap::new();
        for entry in self.db.iter() {
            let (key, value) = entry
                .map_err(|e| schedkit_core::Error::Storage(format!("sled iteration failed: {e}")))?;
            let key = String::from_utf8_lossy(&key).to_string();
            let value: Value = serde_json::from_slice(&value).map_err(|e| {
                schedkit_core::Error::Validation(format!("corrupt sled entry for {key}: {e}"))
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
        match self
            .db
            .get(job_id)
            .map_err(|e| schedkit_core::Error::Storage(format!("sled get failed: {e}")))?
        {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    schedkit_core::Error::Validation(format!("corrupt sled entry for {job_id}: {e}"))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn save_one(&self, job_id: &str, entry: Value) -> Result<()> {
        let bytes = serde_json::to_vec(&entry)
            .map_err(|e| schedkit_core::Error::Validation(format!("failed to serialize entry: {e}")))?;
        self.db
            .insert(job_id, bytes)
            .map_err(|e| schedkit_core::Error::Storage(format!("sled insert failed: {e}")))?;
        self.db
            .flush_async()
            .await
            .map_err(|e| schedkit_core::Error::Storage(format!("sled flush failed: {e}")))?;
        Ok(())
    }
}
