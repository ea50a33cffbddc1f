//! Scheduler metric recording
//!
//! Thin wrappers over the `metrics` facade. Without an installed recorder
//! every call is a no-op.

use contracts::{PriorityClass, QueueSnapshot};
use metrics::{counter, gauge};

/// Record a customer check-in
pub fn record_check_in(class: PriorityClass) {
    counter!(
        "service_scheduler_check_ins_total",
        "class" => class.as_str()
    )
    .increment(1);
}

/// Record a customer handed out for service
pub fn record_served(class: PriorityClass) {
    counter!(
        "service_scheduler_served_total",
        "class" => class.as_str()
    )
    .increment(1);
}

/// Record a dequeue that found both queues empty
pub fn record_idle_poll() {
    counter!("service_scheduler_idle_polls_total").increment(1);
}

/// Record a lookup by contact key
pub fn record_lookup(found: bool) {
    let outcome = if found { "found" } else { "not_found" };
    counter!(
        "service_scheduler_lookups_total",
        "outcome" => outcome
    )
    .increment(1);
}

/// Record current queue depths per class
pub fn record_queue_depth(snapshot: &QueueSnapshot) {
    gauge!(
        "service_scheduler_queue_depth",
        "class" => PriorityClass::High.as_str()
    )
    .set(snapshot.high_waiting as f64);
    gauge!(
        "service_scheduler_queue_depth",
        "class" => PriorityClass::Normal.as_str()
    )
    .set(snapshot.normal_waiting as f64);
    gauge!("service_scheduler_last_issued").set(snapshot.last_issued as f64);
}
