//! Dispatcher - queue state behind a single mutex
//!
//! Every operation takes the lock once, so numbering, both queues and the
//! HIGH-run counter always change together. Metrics are recorded before the
//! guard drops. The lock is never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contracts::{
    CheckIn, PolicyConfig, QueueSnapshot, SchedulerError, ServiceQueue, ServiceRecord,
};

use crate::metrics::DispatcherMetrics;
use crate::state::DispatchState;

/// Lock-guarded dispatcher, shareable across threads behind an `Arc`
#[derive(Debug)]
pub struct Dispatcher {
    state: Mutex<DispatchState>,
    metrics: Arc<DispatcherMetrics>,
}

impl Dispatcher {
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            state: Mutex::new(DispatchState::new(policy)),
            metrics: Arc::new(DispatcherMetrics::new()),
        }
    }

    /// Dispatcher with the given ratio threshold and default lookup order
    pub fn with_ratio_threshold(ratio_threshold: u32) -> Self {
        Self::new(&PolicyConfig {
            ratio_threshold,
            ..PolicyConfig::default()
        })
    }

    pub fn metrics(&self) -> &Arc<DispatcherMetrics> {
        &self.metrics
    }

    /// Number the check-in and queue it
    pub fn enqueue(&self, check_in: CheckIn) -> ServiceRecord {
        let class = check_in.priority_class;
        let mut state = self.lock();
        let record = state.enqueue(check_in);
        // Under the guard so queue-depth gauges are published in state order
        self.metrics.record_check_in(class, &state.snapshot());
        record
    }

    /// Pop the next customer, `None` when nobody is waiting
    pub fn dequeue_next(&self) -> Option<ServiceRecord> {
        let mut state = self.lock();
        let record = state.dequeue_next();
        self.metrics
            .record_dequeue(record.as_ref().map(|r| r.priority_class), &state.snapshot());
        record
    }

    /// Copy of the first waiting record with this contact key
    pub fn find_by_key(&self, key: &str) -> Result<ServiceRecord, SchedulerError> {
        let result = self.lock().find_by_key(key).cloned();
        if !matches!(result, Err(SchedulerError::InvalidKey)) {
            self.metrics.record_lookup(result.is_ok());
        }
        result
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.lock().snapshot()
    }

    /// State is changed in single steps under the guard, so a panic elsewhere
    /// while holding it cannot leave it half-updated.
    fn lock(&self) -> MutexGuard<'_, DispatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}

impl ServiceQueue for Dispatcher {
    async fn enqueue(&self, check_in: CheckIn) -> Result<ServiceRecord, SchedulerError> {
        Ok(Dispatcher::enqueue(self, check_in))
    }

    async fn dequeue_next(&self) -> Result<Option<ServiceRecord>, SchedulerError> {
        Ok(Dispatcher::dequeue_next(self))
    }

    async fn find_by_key(&self, key: &str) -> Result<ServiceRecord, SchedulerError> {
        Dispatcher::find_by_key(self, key)
    }

    async fn snapshot(&self) -> Result<QueueSnapshot, SchedulerError> {
        Ok(Dispatcher::snapshot(self))
    }
}
