//! ABOUTME: Stub remote key-value persistence backend
//! ABOUTME: Grounded on persistence/redis.py, itself already a stub over an in-memory store

use super::PersistenceBackend;
use async_trait::async_trait;
use schedkit_core::Result;
use serde_json::Value;
use std::collections::HashMap;

/// Placeholder for a networked key-value backend (Redis or similar).
/// The constructor accepts a connection string for API compatibility
/// with a future real transport, but every operation currently returns
/// `Error::Unimplemented` — the upstream Python implementation this is
/// modeled on is itself only a stub over an in-memory dict, not a real
/// Redis client.
pub struct RemoteKvBackend {
    url: String,
}

impl RemoteKvBackend {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl PersistenceBackend for RemoteKvBackend {
    async fn load(&self) -> Result<HashMap<String, Value>> {
        Err(schedkit_core::Error::Unimplemented(format!(
            "remote kv backend ({}) is not wired to a transport",
            self.url
        )))
    }

    async fn save(&self, _data: &HashMap<String, Value>) -> Result<()> {
        Err(schedkit_core::Error::Unimplemented(format!(
            "remote kv backend ({}) is not wired to a transport",
            self.url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn load_reports_unimplemented() {
        let backend = RemoteKvBackend::new("redis://localhost:6379");
        let err = backend.load().await.unwrap_err();
        assert!(matches!(err, schedkit_core::Error::Unimplemented(_)));
    }

    #[tokio::test]
    async fn save_reports_unimplemented() {
        let backend = RemoteKvBackend::new("redis://localhost:6379");
        let err = backend.save(&HashMap::new()).await.unwrap_err();
        assert!(matches!(err, schedkit_core::Error::Unimplemented(_)));
    }
}
