//! Metrics collection module
//!
//! Tracks submissions, their outcomes and service response times.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Outcome of one completed dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Loaded,
    Empty,
    Failed,
}

/// Lock-free counters shared between the controller and the shells
#[derive(Debug, Default)]
pub struct Metrics {
    submissions: AtomicU64,
    ignored: AtomicU64,
    loaded: AtomicU64,
    empty: AtomicU64,
    failed: AtomicU64,
    completed: AtomicU64,
    response_time_ms: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment dispatched submission count
    pub fn inc_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment blank-query submission count
    pub fn inc_ignored(&self) {
        self.ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed dispatch
    pub fn record(&self, outcome: Outcome, elapsed: Duration) {
        let counter = match outcome {
            Outcome::Loaded => &self.loaded,
            Outcome::Empty => &self.empty,
            Outcome::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.response_time_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let completed = self.completed.load(Ordering::Relaxed);
        let total_ms = self.response_time_ms.load(Ordering::Relaxed);

        MetricsSnapshot {
            submissions: self.submissions.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            loaded: self.loaded.load(Ordering::Relaxed),
            empty: self.empty.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            avg_response_ms: if completed == 0 {
                None
            } else {
                Some(total_ms / completed)
            },
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub submissions: u64,
    pub ignored: u64,
    pub loaded: u64,
    pub empty: u64,
    pub failed: u64,
    pub avg_response_ms: Option<u64>,
}

impl MetricsSnapshot {
    /// Dispatches still waiting for an answer
    pub fn in_flight(&self) -> u64 {
        self.submissions
            .saturating_sub(self.loaded + self.empty + self.failed)
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "searches: {} (loaded {}, empty {}, failed {}, in flight {}), ignored: {}",
            self.submissions,
            self.loaded,
            self.empty,
            self.failed,
            self.in_flight(),
            self.ignored
        )?;
        if let Some(avg) = self.avg_response_ms {
            write!(f, ", avg response: {} ms", avg)?;
        }
        Ok(())
    }
}
