//! Dispatcher metrics for observability
//!
//! Lock-free counters read by the stats endpoint; each update is mirrored to
//! the global `metrics` recorder.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use contracts::{PriorityClass, QueueSnapshot};

/// Counters of a single dispatcher
#[derive(Debug, Default)]
pub struct DispatcherMetrics {
    checked_in_high: AtomicU64,
    checked_in_normal: AtomicU64,
    served_high: AtomicU64,
    served_normal: AtomicU64,
    /// Dequeue calls that found both queues empty
    idle_polls: AtomicU64,
    lookups: AtomicU64,
    lookup_misses: AtomicU64,
}

impl DispatcherMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a check-in and the resulting queue depths
    pub fn record_check_in(&self, class: PriorityClass, snapshot: &QueueSnapshot) {
        match class {
            PriorityClass::High => self.checked_in_high.fetch_add(1, Ordering::Relaxed),
            PriorityClass::Normal => self.checked_in_normal.fetch_add(1, Ordering::Relaxed),
        };
        observability::record_check_in(class);
        observability::record_queue_depth(snapshot);
    }

    /// Record a dequeue outcome and the resulting queue depths
    pub fn record_dequeue(&self, served: Option<PriorityClass>, snapshot: &QueueSnapshot) {
        let Some(class) = served else {
            self.idle_polls.fetch_add(1, Ordering::Relaxed);
            observability::record_idle_poll();
            return;
        };

        match class {
            PriorityClass::High => self.served_high.fetch_add(1, Ordering::Relaxed),
            PriorityClass::Normal => self.served_normal.fetch_add(1, Ordering::Relaxed),
        };
        observability::record_served(class);
        observability::record_queue_depth(snapshot);
    }

    /// Record a lookup by contact key
    pub fn record_lookup(&self, found: bool) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        if !found {
            self.lookup_misses.fetch_add(1, Ordering::Relaxed);
        }
        observability::record_lookup(found);
    }

    pub fn served(&self, class: PriorityClass) -> u64 {
        match class {
            PriorityClass::High => self.served_high.load(Ordering::Relaxed),
            PriorityClass::Normal => self.served_normal.load(Ordering::Relaxed),
        }
    }

    pub fn checked_in(&self, class: PriorityClass) -> u64 {
        match class {
            PriorityClass::High => self.checked_in_high.load(Ordering::Relaxed),
            PriorityClass::Normal => self.checked_in_normal.load(Ordering::Relaxed),
        }
    }

    pub fn idle_polls(&self) -> u64 {
        self.idle_polls.load(Ordering::Relaxed)
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            checked_in_high: self.checked_in(PriorityClass::High),
            checked_in_normal: self.checked_in(PriorityClass::Normal),
            served_high: self.served(PriorityClass::High),
            served_normal: self.served(PriorityClass::Normal),
            idle_polls: self.idle_polls(),
            lookups: self.lookups.load(Ordering::Relaxed),
            lookup_misses: self.lookup_misses.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher counters (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub checked_in_high: u64,
    pub checked_in_normal: u64,
    pub served_high: u64,
    pub served_normal: u64,
    pub idle_polls: u64,
    pub lookups: u64,
    pub lookup_misses: u64,
}
