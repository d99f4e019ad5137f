//! ABOUTME: In-memory persistence backend, data lost on process exit
//! ABOUTME: Grounded on persistence/memory.py's dict-backed store

use super::PersistenceBackend;
use async_trait::async_trait;
use schedkit_core::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Keeps the job map in an in-process `HashMap`. Useful for tests and
/// for standalone runs with no durability requirement.
#[derive(Default)]
pub struct MemoryBackend {
    store: Mutex<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PersistenceBackend for MemoryBackend {
    async fn load(&self) -> Result<HashMap<String, Value>> {
        Ok(self.store.lock().unwrap().clone())
    }

    async fn save(&self, data: &HashMap<String, Value>) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        for (k, v) in data {
            store.insert(k.clone(), v.clone());
        }
        Ok(())
    }
}
