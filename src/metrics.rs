use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use serde::{Serialize, Deserialize};

/// Counters for the core's decision and persistence activity.
/// All metrics are atomic counters for thread-safety
#[derive(Clone, Default, Debug)]
pub struct Metrics {
    /// Alerts inserted by the alert engine
    pub alerts_raised: Arc<AtomicU64>,
    /// Adaptive schedules generated
    pub schedules_generated: Arc<AtomicU64>,
    /// Topics marked as reviewed
    pub reviews_marked: Arc<AtomicU64>,
    /// Topics pushed back by a skip
    pub topics_skipped: Arc<AtomicU64>,
    /// Study sessions ended or entered manually
    pub sessions_completed: Arc<AtomicU64>,
    /// Collection writes that failed and were swallowed
    pub persistence_failures: Arc<AtomicU64>,
}

/// Point-in-time copy of the counters, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub alerts_raised: u64,
    pub schedules_generated: u64,
    pub reviews_marked: u64,
    pub topics_skipped: u64,
    pub sessions_completed: u64,
    pub persistence_failures: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_alert_raised(&self) {
        self.alerts_raised.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_schedule_generated(&self) {
        self.schedules_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_review_marked(&self) {
        self.reviews_marked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_topic_skipped(&self) {
        self.topics_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_session_completed(&self) {
        self.sessions_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_persistence_failure(&self) {
        self.persistence_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            alerts_raised: self.alerts_raised.load(Ordering::Relaxed),
            schedules_generated: self.schedules_generated.load(Ordering::Relaxed),
            reviews_marked: self.reviews_marked.load(Ordering::Relaxed),
            topics_skipped: self.topics_skipped.load(Ordering::Relaxed),
            sessions_completed: self.sessions_completed.load(Ordering::Relaxed),
            persistence_failures: self.persistence_failures.load(Ordering::Relaxed),
        }
    }
}
