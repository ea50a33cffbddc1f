//! DispatchState - the two class queues and the ratio policy
//!
//! Plain owned state with `&mut self` mutation. Callers provide the
//! serialization point (a mutex or a single owning task).

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use contracts::{
    CheckIn, ContactKey, LookupOrder, PolicyConfig, PriorityClass, QueueSnapshot, SchedulerError,
    ServiceRecord,
};

/// Queue state of the dispatcher
///
/// Invariants:
/// - every queued record has `service_number <= last_issued`, and numbers are unique
/// - records keep insertion order within their class
/// - `consecutive_high <= ratio_threshold`
#[derive(Debug)]
pub struct DispatchState {
    high: VecDeque<ServiceRecord>,
    normal: VecDeque<ServiceRecord>,
    last_issued: u64,
    consecutive_high: u32,
    ratio_threshold: u32,
    lookup_order: LookupOrder,
}

impl DispatchState {
    /// Create an empty state for the given policy
    ///
    /// A ratio threshold of 0 is raised to 1; the config validator rejects it
    /// earlier for loaded configurations.
    pub fn new(policy: &PolicyConfig) -> Self {
        Self {
            high: VecDeque::new(),
            normal: VecDeque::new(),
            last_issued: 0,
            consecutive_high: 0,
            ratio_threshold: policy.ratio_threshold.max(1),
            lookup_order: policy.lookup_order,
        }
    }

    /// Issue the next service number and append to the class queue tail
    pub fn enqueue(&mut self, check_in: CheckIn) -> ServiceRecord {
        self.last_issued += 1;
        let record = check_in.into_record(self.last_issued);

        info!(
            service_number = record.service_number,
            class = %record.priority_class,
            name = %record.name,
            "Customer checked in"
        );

        self.queue_mut(record.priority_class).push_back(record.clone());
        record
    }

    /// Pop the next record by the ratio policy
    ///
    /// 1. HIGH if waiting and (under the threshold or NORMAL is empty)
    /// 2. otherwise NORMAL if waiting, resetting the HIGH run
    /// 3. otherwise `None`, leaving the state untouched
    pub fn dequeue_next(&mut self) -> Option<ServiceRecord> {
        let prefer_high = !self.high.is_empty()
            && (self.consecutive_high < self.ratio_threshold || self.normal.is_empty());

        let record = if prefer_high {
            let record = self.high.pop_front()?;
            // Saturates while NORMAL is empty, selection treats it the same
            self.consecutive_high = (self.consecutive_high + 1).min(self.ratio_threshold);
            record
        } else {
            let record = self.normal.pop_front();
            match record {
                Some(record) => {
                    self.consecutive_high = 0;
                    record
                }
                None => {
                    debug!("No customers to serve");
                    return None;
                }
            }
        };

        info!(
            service_number = record.service_number,
            class = %record.priority_class,
            name = %record.name,
            consecutive_high = self.consecutive_high,
            "Serving customer"
        );
        Some(record)
    }

    /// First record whose contact key equals `key`, in configured scan order
    pub fn find_by_key(&self, key: &str) -> Result<&ServiceRecord, SchedulerError> {
        let key = ContactKey::check(key).inspect_err(|_| {
            warn!("Invalid contact key provided for customer search");
        })?;

        let order = match self.lookup_order {
            LookupOrder::NormalFirst => [PriorityClass::Normal, PriorityClass::High],
            LookupOrder::HighFirst => [PriorityClass::High, PriorityClass::Normal],
        };

        order
            .into_iter()
            .find_map(|class| self.queue(class).iter().find(|r| r.contact_key == key))
            .ok_or_else(|| {
                debug!(contact_key = %key, "Customer not found");
                SchedulerError::not_found(key)
            })
    }

    /// Undo a dequeue whose record could not be handed to anyone
    ///
    /// Puts `record` back at the head of its class queue and restores the HIGH-run
    /// counter observed before that dequeue.
    pub fn requeue_front(&mut self, record: ServiceRecord, prev_consecutive_high: u32) {
        debug!(
            service_number = record.service_number,
            class = %record.priority_class,
            "Customer returned to queue head"
        );
        self.consecutive_high = prev_consecutive_high.min(self.ratio_threshold);
        self.queue_mut(record.priority_class).push_front(record);
    }

    pub fn consecutive_high(&self) -> u32 {
        self.consecutive_high
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            high_waiting: self.high.len(),
            normal_waiting: self.normal.len(),
            last_issued: self.last_issued,
            consecutive_high_served: self.consecutive_high,
        }
    }

    pub fn ratio_threshold(&self) -> u32 {
        self.ratio_threshold
    }

    fn queue(&self, class: PriorityClass) -> &VecDeque<ServiceRecord> {
        match class {
            PriorityClass::High => &self.high,
            PriorityClass::Normal => &self.normal,
        }
    }

    fn queue_mut(&mut self, class: PriorityClass) -> &mut VecDeque<ServiceRecord> {
        match class {
            PriorityClass::High => &mut self.high,
            PriorityClass::Normal => &mut self.normal,
        }
    }
}

impl Default for DispatchState {
    fn default() -> Self {
        Self::new(&PolicyConfig::default())
    }
}
