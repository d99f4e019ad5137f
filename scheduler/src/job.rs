//! ABOUTME: Job value object: identity, callable body, interval, run counter, status
//! ABOUTME: Reconstructed (persisted) jobs carry an inert placeholder body

use futures_util::future::BoxFuture;
use schedkit_core::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Tri-state outcome of a job's most recent execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Unset,
    Success,
    Failure,
}

/// The persisted shape of a job's metadata (spec §6's JSON record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    #[serde(default)]
    pub count: u64,
    pub interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status: Option<String>,
    pub next_run: Option<f64>,
}

/// A job's callable body. `Sync` bodies run on a blocking-task pool so
/// they never stall the worker's own tokio task; `Async` bodies are
/// simply awaited, since the worker task already is the cooperative
/// executor an awaitable needs. `Inert` is what a job reconstructed
/// from persisted metadata gets: it yields `Value::Null` and never
/// fails.
#[derive(Clone)]
pub enum JobBody {
    Sync(Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>),
    Async(Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value>> + Send + Sync>),
    Inert,
}

impl JobBody {
    async fn invoke(&self, arg: Value) -> Result<Value> {
        match self {
            JobBody::Sync(f) => {
                let f = f.clone();
                tokio::task::spawn_blocking(move || f(arg))
                    .await
                    .map_err(|e| schedkit_core::Error::External(format!("job body panicked: {e}")))?
            }
            JobBody::Async(f) => f(arg).await,
            JobBody::Inert => Ok(Value::Null),
        }
    }
}

/// A scheduled unit of work: identity, callable body, optional
/// recurrence interval, and run metadata.
pub struct Job {
    pub id: String,
    pub body: JobBody,
    pub interval: Option<f64>,
    pub count: u64,
    pub last_status: Option<JobStatus>,
    pub next_run: Option<f64>,
}

impl Job {
    pub fn new(id: String, body: JobBody, interval: Option<f64>) -> Self {
        Self {
            id,
            body,
            interval,
            count: 0,
            last_status: None,
            next_run: None,
        }
    }

    /// Execute the body, driving an async body to completion or
    /// running a sync body on a blocking task. Does not touch
    /// `count`/`last_status`/`next_run` — the caller (the worker loop,
    /// or `trigger`) updates those per its own semantics.
    pub async fn run(&self, arg: Value) -> Result<Value> {
        self.body.invoke(arg).await
    }

    pub fn to_record(&self) -> JobRecord {
        JobRecord {
            id: self.id.clone(),
            count: self.count,
            interval: self.interval,
            last_status: self.last_status.map(|s| match s {
                JobStatus::Unset => unreachable!("last_status is never stored as Unset"),
                JobStatus::Success => "success".to_string(),
                JobStatus::Failure => "failure".to_string(),
            }),
            next_run: self.next_run,
        }
    }

    /// Reconstruct a job from a persisted record. The resulting job
    /// carries an inert placeholder body and cannot be executed by a
    /// worker until re-registered with a live body.
    pub fn from_record(record: JobRecord) -> Self {
        Self {
            id: record.id,
            body: JobBody::Inert,
            interval: record.interval,
            count: record.count,
            last_status: match record.last_status.as_deref() {
                Some("success") => Some(JobStatus::Success),
                Some("failure") => Some(JobStatus::Failure),
                _ => None,
            },
            next_run: record.next_run,
        }
    }
}
