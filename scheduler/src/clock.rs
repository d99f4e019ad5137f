//! ABOUTME: Monotonic time source with interruptible sleep
//! ABOUTME: Injectable so tests can drive scheduling deterministically

use schedkit_core::MonotonicTimer;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why a cancellable wait returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The target instant was reached.
    Elapsed,
    /// The cancel signal fired before the target instant.
    Cancelled,
}

/// A monotonic time source with a cancellable wait.
///
/// The cancel signal is a `CancellationToken` rather than a `Notify`:
/// it is sticky (once cancelled, every subsequent `cancelled().await`
/// resolves immediately), which is what a one-shot shutdown signal
/// observed by many concurrently-polling workers actually needs — a
/// plain `Notify::notify_waiters` can race with a worker that hasn't
/// started its next `notified()` call yet and miss it entirely.
#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    /// Seconds elapsed since this clock's own epoch.
    fn now(&self) -> f64;

    /// Block until either `target` (seconds, same epoch as `now`) is
    /// reached or `cancel` fires, polling in slices no larger than
    /// 100ms so interval adjustments take effect promptly.
    async fn wait_until(&self, target: f64, cancel: &CancellationToken) -> WaitOutcome;
}

const POLL_GRANULARITY: Duration = Duration::from_millis(100);

/// Real wall-clock time, backed by `schedkit_core::MonotonicTimer`.
pub struct SystemClock {
    timer: MonotonicTimer,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            timer: MonotonicTimer::new(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.timer.elapsed().as_secs_f64()
    }

    async fn wait_until(&self, target: f64, cancel: &CancellationToken) -> WaitOutcome {
        loop {
            if cancel.is_cancelled() {
                return WaitOutcome::Cancelled;
            }
            let remaining = target - self.now();
            if remaining <= 0.0 {
                return WaitOutcome::Elapsed;
            }
            let slice = Duration::from_secs_f64(remaining).min(POLL_GRANULARITY);
            tokio::select! {
                _ = tokio::time::sleep(slice) => continue,
                _ = cancel.cancelled() => return WaitOutcome::Cancelled,
            }
        }
    }
}

/// A test clock advanced explicitly by the test, rather than by wall time.
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self { now: Mutex::new(0.0) }
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance(&self, secs: f64) {
        let mut now = self.now.lock().unwrap();
        *now += secs;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Clock for ManualClock {
    fn now(&self) -> f64 {
        *self.now.lock().unwrap()
    }

    async fn wait_until(&self, target: f64, cancel: &CancellationToken) -> WaitOutcome {
        loop {
            if cancel.is_cancelled() {
                return WaitOutcome::Cancelled;
            }
            if self.now() >= target {
                return WaitOutcome::Elapsed;
            }
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(1)) => continue,
                _ = cancel.cancelled() => return WaitOutcome::Cancelled,
            }
        }
    }
}
