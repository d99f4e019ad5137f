//! ABOUTME: Pluggable persistence for job metadata snapshots
//! ABOUTME: A single `load`/`save` pair of the whole job map; single-entry ops default to read-modify-write

pub mod file;
pub mod memory;
pub mod remote_kv;
pub mod sled_kv;
pub mod sql;

use async_trait::async_trait;
use schedkit_core::Result;
use serde_json::Value;
use std::collections::HashMap;

/// Stores and retrieves the scheduler's job metadata as a flat map
/// from job id to its JSON record. Implementations are free to choose
/// any storage medium; the scheduler only ever deals in the whole map.
#[async_trait]
pub trait PersistenceBackend: Send + Sync {
    /// Load the full job map. Backends that cannot find existing data
    /// return an empty map rather than an error.
    async fn load(&self) -> Result<HashMap<String, Value>>;

    /// Persist `data` into the backend's store. Entries are merged in
    /// by key; a key already stored and absent from `data` is left
    /// untouched.
    async fn save(&self, data: &HashMap<String, Value>) -> Result<()>;

    /// Load a single job's record by id. The default implementation
    /// loads the whole map and looks up the entry; backends for which
    /// a targeted read is cheaper may override this.
    async fn load_one(&self, job_id: &str) -> Result<Option<Value>> {
        let data = self.load().await?;
        Ok(data.get(job_id).cloned())
    }

    /// Save a single job's record by id, leaving the rest of the map
    /// untouched. The default implementation is read-modify-write over
    /// the whole map; backends for which a targeted write is cheaper
    /// may override this.
    async fn save_one(&self, job_id: &str, entry: Value) -> Result<()> {
        let mut data = self.load().await?;
        data.insert(job_id.to_string(), entry);
        self.save(&data).await
    }
}
