//! ServiceQueue trait - the three operations the transport layer consumes
//!
//! Implemented by both dispatcher front-ends (lock-guarded and actor task).

use serde::Serialize;

use crate::{CheckIn, SchedulerError, ServiceRecord};

/// Scheduling queue interface
///
/// Every call is applied as a single indivisible step against the queue state.
/// No call waits for future arrivals.
#[trait_variant::make(ServiceQueue: Send)]
pub trait LocalServiceQueue {
    /// Number the check-in and append it to the tail of its class queue
    ///
    /// Returns the stamped record.
    async fn enqueue(&self, check_in: CheckIn) -> Result<ServiceRecord, SchedulerError>;

    /// Pop the next customer according to the ratio policy
    ///
    /// `Ok(None)` means nobody is waiting; it is not an error.
    async fn dequeue_next(&self) -> Result<Option<ServiceRecord>, SchedulerError>;

    /// Find a waiting customer by contact key without removing it
    ///
    /// # Errors
    /// `InvalidKey` for an empty/blank key, `NotFound` when nothing matches
    async fn find_by_key(&self, key: &str) -> Result<ServiceRecord, SchedulerError>;

    /// Point-in-time view of the queue state
    async fn snapshot(&self) -> Result<QueueSnapshot, SchedulerError>;
}

/// Point-in-time view of dispatcher state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    /// Customers waiting in the HIGH queue
    pub high_waiting: usize,
    /// Customers waiting in the NORMAL queue
    pub normal_waiting: usize,
    /// Last service number issued (0 before the first check-in)
    pub last_issued: u64,
    /// HIGH dispatches since the last NORMAL dispatch
    pub consecutive_high_served: u32,
}

impl QueueSnapshot {
    /// Total customers waiting across both classes
    pub fn total_waiting(&self) -> usize {
        self.high_waiting + self.normal_waiting
    }
}
