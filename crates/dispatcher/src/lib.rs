//! # Dispatcher
//!
//! Two-class service dispatcher.
//!
//! Responsibilities:
//! - Issue strictly increasing service numbers at check-in
//! - Keep HIGH and NORMAL customers in FIFO queues
//! - Serve HIGH preferentially, at most `ratio_threshold` in a row while NORMAL
//!   customers wait
//! - Serialize all access through one point (mutex or worker task)

pub mod dispatcher;
pub mod handle;
pub mod metrics;
pub mod state;

use std::sync::Arc;

use tracing::info;

pub use contracts::{
    CheckIn, PriorityClass, QueueSnapshot, SchedulerError, ServiceQueue, ServiceRecord,
};
pub use dispatcher::Dispatcher;
pub use handle::DispatcherHandle;
pub use metrics::{DispatcherMetrics, MetricsSnapshot};
pub use state::DispatchState;

use contracts::{DispatchMode, PolicyConfig};

/// Dispatcher front-end selected by configuration
pub enum AnyDispatcher {
    Mutex(Dispatcher),
    Actor(DispatcherHandle),
}

impl AnyDispatcher {
    pub fn metrics(&self) -> &Arc<DispatcherMetrics> {
        match self {
            Self::Mutex(d) => d.metrics(),
            Self::Actor(h) => h.metrics(),
        }
    }

    pub fn mode(&self) -> DispatchMode {
        match self {
            Self::Mutex(_) => DispatchMode::Mutex,
            Self::Actor(_) => DispatchMode::Actor,
        }
    }

    /// Stop the worker task of the actor front-end; no-op for the mutex one
    pub async fn shutdown(&self) {
        if let Self::Actor(handle) = self {
            handle.shutdown().await;
        }
    }
}

impl ServiceQueue for AnyDispatcher {
    async fn enqueue(&self, check_in: CheckIn) -> Result<ServiceRecord, SchedulerError> {
        match self {
            Self::Mutex(d) => Ok(d.enqueue(check_in)),
            Self::Actor(h) => h.enqueue(check_in).await,
        }
    }

    async fn dequeue_next(&self) -> Result<Option<ServiceRecord>, SchedulerError> {
        match self {
            Self::Mutex(d) => Ok(d.dequeue_next()),
            Self::Actor(h) => h.dequeue_next().await,
        }
    }

    async fn find_by_key(&self, key: &str) -> Result<ServiceRecord, SchedulerError> {
        match self {
            Self::Mutex(d) => d.find_by_key(key),
            Self::Actor(h) => h.find_by_key(key).await,
        }
    }

    async fn snapshot(&self) -> Result<QueueSnapshot, SchedulerError> {
        match self {
            Self::Mutex(d) => Ok(d.snapshot()),
            Self::Actor(h) => h.snapshot().await,
        }
    }
}

/// Build the front-end named by `policy.mode`
///
/// The actor front-end spawns its worker, so this must run inside a tokio runtime.
pub fn create_dispatcher(policy: &PolicyConfig) -> AnyDispatcher {
    info!(
        mode = ?policy.mode,
        ratio_threshold = policy.ratio_threshold,
        lookup_order = ?policy.lookup_order,
        "Creating dispatcher"
    );
    match policy.mode {
        DispatchMode::Mutex => AnyDispatcher::Mutex(Dispatcher::new(policy)),
        DispatchMode::Actor => AnyDispatcher::Actor(DispatcherHandle::spawn(policy)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn serve_all(queue: &AnyDispatcher) -> Vec<String> {
        let mut served = Vec::new();
        while let Some(record) = queue.dequeue_next().await.unwrap() {
            served.push(record.name);
        }
        served
    }

    #[tokio::test]
    async fn test_both_modes_agree() {
        for mode in [DispatchMode::Mutex, DispatchMode::Actor] {
            let policy = PolicyConfig {
                mode,
                ..PolicyConfig::default()
            };
            let dispatcher = create_dispatcher(&policy);
            assert_eq!(dispatcher.mode(), mode);

            for i in 0..3 {
                dispatcher
                    .enqueue(CheckIn::normal(format!("N{i}"), format!("n{i}")))
                    .await
                    .unwrap();
            }
            for i in 0..3 {
                dispatcher
                    .enqueue(CheckIn::high(format!("H{i}"), format!("h{i}")))
                    .await
                    .unwrap();
            }

            assert_eq!(
                serve_all(&dispatcher).await,
                vec!["H0", "H1", "N0", "H2", "N1", "N2"],
                "mode {mode:?}"
            );
            assert_eq!(dispatcher.metrics().snapshot().idle_polls, 1);
            dispatcher.shutdown().await;
        }
    }
}
