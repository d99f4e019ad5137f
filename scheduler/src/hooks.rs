//! ABOUTME: Registration and dispatch of named lifecycle event callbacks
//! ABOUTME: Isolated from job execution: a failing handler never stops the others

use schedkit_core::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::warn;

/// A hook handler. Takes the job id and an event-specific payload
/// (`Value::Null` for `start`/`success`, the error message for
/// `failure`). Return values are ignored; a returned `Err` is
/// swallowed by `emit` and logged, never propagated to the caller.
pub type HookHandler = Box<dyn Fn(&str, &Value) -> Result<()> + Send + Sync>;

const VALID_EVENTS: [&str; 3] = ["start", "success", "failure"];

/// Registers and dispatches handlers for the three recognized
/// scheduler lifecycle events.
pub struct HookManager {
    handlers: Mutex<HashMap<String, Vec<HookHandler>>>,
}

impl HookManager {
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(HashMap::new()),
        }
    }

    /// Register `handler` for `event`. Fails with `InvalidEvent` unless
    /// `event` is one of `start`, `success`, `failure`.
    pub fn register(&self, event: &str, handler: HookHandler) -> Result<()> {
        if !VALID_EVENTS.contains(&event) {
            return Err(Error::InvalidEvent(event.to_string()));
        }
        self.handlers
            .lock()
            .unwrap()
            .entry(event.to_string())
            .or_default()
            .push(handler);
        Ok(())
    }

    /// Invoke every handler registered for `event`, in registration
    /// order. A handler that returns `Err` or panics does not stop the
    /// remaining handlers from running.
    pub fn emit(&self, event: &str, job_id: &str, payload: &Value) {
        let count = {
            let guard = self.handlers.lock().unwrap();
            guard.get(event).map(|v| v.len()).unwrap_or(0)
        };
        for i in 0..count {
            let outcome = {
                let guard = self.handlers.lock().unwrap();
                let handler = match guard.get(event).and_then(|v| v.get(i)) {
                    Some(h) => h,
                    None => continue,
                };
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler(job_id, payload)))
            };
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(event, job_id, error = %e, "hook handler returned an error"),
                Err(_) => warn!(event, job_id, "hook handler panicked"),
            }
        }
    }
}

impl Default for HookManager {
    fn default() -> Self {
        Self::new()
    }
}
