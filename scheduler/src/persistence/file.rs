//! ABOUTME: JSON-file persistence backend, one file holding the whole job map
//! ABOUTME: Grounded on persistence/file.py: unreadable file loads as empty, writes overwrite

use super::PersistenceBackend;
use async_trait::async_trait;
use schedkit_core::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

/// Stores the job map as a single JSON file. A missing or corrupt file
/// is treated as an empty map rather than an error, matching the
/// "best effort" durability the rest of the scheduler expects from a
/// flat-file backend.
pub struct FileBackend {
    path: PathBuf,
    // Serializes writes so concurrent `save_one` calls don't race on
    // the read-modify-write cycle.
    write_guard: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }
}

#[async_trait]
impl PersistenceBackend for FileBackend {
    async fn load(&self) -> Result<HashMap<String, Value>> {
        let path = self.path.clone();
        let contents = tokio::task::spawn_blocking(move || std::fs::read_to_string(&path))
            .await
            .map_err(|e| schedkit_core::Error::External(format!("load task panicked: {e}")))?;

        match contents {
            Ok(text) => Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(error = %e, "job file contained invalid JSON, treating as empty");
                HashMap::new()
            })),
            Err(_) => Ok(HashMap::new()),
        }
    }

    async fn save(&self, data: &HashMap<String, Value>) -> Result<()> {
        let _guard = self.write_guard.lock().unwrap();
        let mut merged = self.load().await?;
        merged.extend(data.iter().map(|(k, v)| (k.clone(), v.clone())));

        let path = self.path.clone();
        let json = serde_json::to_string(&merged)
            .map_err(|e| schedkit_core::Error::Validation(format!("failed to serialize job map: {e}")))?;
        tokio::task::spawn_blocking(move || std::fs::write(&path, json))
            .await
            .map_err(|e| schedkit_core::Error::External(format!("save task panicked: {e}")))?
            .map_err(schedkit_core::Error::Io)?;
        Ok(())
    }
}
