//! ABOUTME: Loads scheduler configuration from environment variables and an optional file
//! ABOUTME: Scoped to exactly the configuration surface spec.md §6 names

use config::{Config as ConfigBuilder, Environment, File};
use schedkit_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which `PersistenceBackend` variant to construct from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    File,
    EmbeddedKv,
    Sql,
    RemoteKv,
}

impl Default for BackendKind {
    fn default() -> Self {
        BackendKind::Memory
    }
}

/// Recognized scheduler configuration, loaded via the `config` crate.
/// Every field here corresponds to a configuration option spec.md §6
/// names as "recognized"; per-backend options beyond these are opaque
/// to the scheduler (callers construct a backend directly when they
/// need something this struct doesn't cover).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Path to the durable metadata file/store. Absent means no
    /// durable metadata.
    pub persist_path: Option<String>,
    /// Path to the leader-election lock file. Absent means standalone
    /// mode (always leader).
    pub leader_lock_path: Option<String>,
    /// Which persistence backend variant `persist_path` addresses.
    pub backend: BackendKind,
    /// `SqlBackend` connection string, e.g. `sqlite://scheduler.db`.
    pub sql_url: Option<String>,
    /// `EmbeddedKvBackend` (sled) directory path.
    pub sled_path: Option<String>,
    /// `RemoteKvBackend` endpoint URL.
    pub remote_kv_url: Option<String>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            persist_path: None,
            leader_lock_path: None,
            backend: BackendKind::default(),
            sql_url: None,
            sled_path: None,
            remote_kv_url: None,
        }
    }
}

impl SchedulerSettings {
    /// Load settings from an optional config file plus `SCHEDKIT_`-prefixed
    /// environment variables, which take precedence over the file.
    pub fn load() -> Result<Self> {
        let mut builder = ConfigBuilder::builder();

        builder = builder.set_default("backend", "memory")?;

        if std::path::Path::new("scheduler.toml").exists() {
            builder = builder.add_source(File::with_name("scheduler").required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEDKIT")
                .try_parsing(true)
                .separator("_"),
        );

        let built = builder
            .build()
            .map_err(|e| Error::Config(format!("failed to build scheduler config: {e}")))?;

        built
            .try_deserialize()
            .map_err(|e| Error::Config(format!("failed to deserialize scheduler config: {e}")))
    }
}
