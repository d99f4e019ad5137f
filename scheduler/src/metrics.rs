//! ABOUTME: In-process Prometheus-style metrics for job runs, failures, and latency
//! ABOUTME: Counters are concurrent-safe; rendering preserves first-seen-per-family order

use dashmap::DashMap;
use linked_hash_map::LinkedHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Collects per-job success/failure counters and latency-sample counts,
/// and renders them in Prometheus text exposition format.
///
/// Grounded directly in `metrics/collector.py`: three independent maps
/// (`success`, `failure`, `latency`), each keyed by job id and each
/// populated only by the event it tracks — a job that has only ever
/// failed never appears in `success`, so it never gets a
/// `job_runs_total` line.
pub struct MetricsCollector {
    success: DashMap<String, AtomicU64>,
    failure: DashMap<String, AtomicU64>,
    latency_count: DashMap<String, AtomicU64>,
    // Each family tracks its own first-seen job-id order, independent
    // of the others and of DashMap's iteration order.
    success_order: Mutex<LinkedHashMap<String, ()>>,
    failure_order: Mutex<LinkedHashMap<String, ()>>,
    latency_order: Mutex<LinkedHashMap<String, ()>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            success: DashMap::new(),
            failure: DashMap::new(),
            latency_count: DashMap::new(),
            success_order: Mutex::new(LinkedHashMap::new()),
            failure_order: Mutex::new(LinkedHashMap::new()),
            latency_order: Mutex::new(LinkedHashMap::new()),
        }
    }

    /// Record a successful completion for `job_id`.
    pub fn record_success(&self, job_id: &str) {
        self.success
            .entry(job_id.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::SeqCst);
        let mut order = self.success_order.lock().unwrap();
        if !order.contains_key(job_id) {
            order.insert(job_id.to_string(), ());
        }
    }

    /// Record a failed completion for `job_id`.
    pub fn record_failure(&self, job_id: &str) {
        self.failure
            .entry(job_id.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::SeqCst);
        let mut order = self.failure_order.lock().unwrap();
        if !order.contains_key(job_id) {
            order.insert(job_id.to_string(), ());
        }
    }

    /// Append a latency sample for `job_id`. Only the sample count is
    /// retained (the histogram `_count` series); individual values are
    /// not needed for the exposition format spec'd here.
    pub fn record_latency(&self, job_id: &str, _seconds: Duration) {
        self.latency_count
            .entry(job_id.to_string())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(1, Ordering::SeqCst);
        let mut order = self.latency_order.lock().unwrap();
        if !order.contains_key(job_id) {
            order.insert(job_id.to_string(), ());
        }
    }

    /// Render all three metric families in Prometheus text exposition
    /// format. Families appear in the order runs, failures,
    /// latency-count; within a family, lines follow that family's own
    /// first-seen job-id order.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let success_order = self.success_order.lock().unwrap();
        for job_id in success_order.keys() {
            if let Some(c) = self.success.get(job_id) {
                out.push_str(&format!(
                    "job_runs_total{{job_id=\"{job_id}\"}} {}\n",
                    c.load(Ordering::SeqCst)
                ));
            }
        }

        let failure_order = self.failure_order.lock().unwrap();
        for job_id in failure_order.keys() {
            if let Some(c) = self.failure.get(job_id) {
                out.push_str(&format!(
                    "job_failures_total{{job_id=\"{job_id}\"}} {}\n",
                    c.load(Ordering::SeqCst)
                ));
            }
        }

        let latency_order = self.latency_order.lock().unwrap();
        for job_id in latency_order.keys() {
            if let Some(c) = self.latency_count.get(job_id) {
                out.push_str(&format!(
                    "job_latency_seconds_count{{job_id=\"{job_id}\"}} {}\n",
                    c.load(Ordering::SeqCst)
                ));
            }
        }

        out
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
