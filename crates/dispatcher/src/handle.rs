//! DispatcherHandle - queue state owned by a single worker task
//!
//! Requests travel over an mpsc channel and are applied one at a time, so the
//! task itself is the serialization point. Replies come back on oneshot
//! channels.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use contracts::{
    CheckIn, ContactKey, PolicyConfig, QueueSnapshot, SchedulerError, ServiceQueue,
    ServiceRecord,
};

use crate::metrics::DispatcherMetrics;
use crate::state::DispatchState;

/// Request sent to the worker task
#[derive(Debug)]
enum Command {
    Enqueue {
        check_in: CheckIn,
        reply: oneshot::Sender<ServiceRecord>,
    },
    DequeueNext {
        reply: oneshot::Sender<Option<ServiceRecord>>,
    },
    FindByKey {
        key: String,
        reply: oneshot::Sender<Result<ServiceRecord, SchedulerError>>,
    },
    Snapshot {
        reply: oneshot::Sender<QueueSnapshot>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

impl Command {
    /// Whether the caller stopped waiting for the reply
    fn is_abandoned(&self) -> bool {
        match self {
            Self::Enqueue { reply, .. } => reply.is_closed(),
            Self::DequeueNext { reply } => reply.is_closed(),
            Self::FindByKey { reply, .. } => reply.is_closed(),
            Self::Snapshot { reply } => reply.is_closed(),
            Self::Shutdown { .. } => false,
        }
    }
}

/// Handle to a running dispatcher worker
pub struct DispatcherHandle {
    /// Channel to send requests to worker
    tx: mpsc::Sender<Command>,
    /// Shared metrics
    metrics: Arc<DispatcherMetrics>,
    /// Worker task handle
    worker_handle: JoinHandle<()>,
}

impl DispatcherHandle {
    /// Spawn the worker task with a request channel of `policy.actor_capacity`
    pub fn spawn(policy: &PolicyConfig) -> Self {
        let (tx, rx) = mpsc::channel(policy.actor_capacity.max(1));
        let metrics = Arc::new(DispatcherMetrics::new());
        let state = DispatchState::new(policy);

        let worker_metrics = Arc::clone(&metrics);
        let worker_handle = tokio::spawn(async move {
            dispatcher_worker(state, rx, worker_metrics).await;
        });

        Self {
            tx,
            metrics,
            worker_handle,
        }
    }

    pub fn metrics(&self) -> &Arc<DispatcherMetrics> {
        &self.metrics
    }

    /// Whether the worker task has stopped
    pub fn is_finished(&self) -> bool {
        self.worker_handle.is_finished()
    }

    /// Stop the worker once queued requests are drained
    ///
    /// Requests sent afterwards fail with `Unavailable`. Returns at once if the
    /// worker already stopped.
    #[instrument(name = "dispatcher_handle_shutdown", skip(self))]
    pub async fn shutdown(&self) {
        match self.request(|reply| Command::Shutdown { reply }).await {
            Ok(()) => debug!("DispatcherHandle shutdown complete"),
            Err(_) => debug!("Dispatcher worker already stopped"),
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SchedulerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| SchedulerError::unavailable("dispatcher worker stopped"))?;
        rx.await.map_err(|_| {
            error!("Dispatcher worker dropped a request without replying");
            SchedulerError::unavailable("dispatcher worker dropped the request")
        })
    }
}

impl ServiceQueue for DispatcherHandle {
    #[instrument(name = "dispatcher_handle_enqueue", skip(self, check_in))]
    async fn enqueue(&self, check_in: CheckIn) -> Result<ServiceRecord, SchedulerError> {
        self.request(|reply| Command::Enqueue { check_in, reply })
            .await
    }

    #[instrument(name = "dispatcher_handle_dequeue_next", skip(self))]
    async fn dequeue_next(&self) -> Result<Option<ServiceRecord>, SchedulerError> {
        self.request(|reply| Command::DequeueNext { reply }).await
    }

    #[instrument(name = "dispatcher_handle_find_by_key", skip(self))]
    async fn find_by_key(&self, key: &str) -> Result<ServiceRecord, SchedulerError> {
        // Rejected here so a blank key never reaches the worker
        let key = ContactKey::check(key)?.to_string();
        self.request(|reply| Command::FindByKey { key, reply })
            .await?
    }

    async fn snapshot(&self) -> Result<QueueSnapshot, SchedulerError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }
}

/// Worker task that owns the queue state and applies requests in order
#[instrument(name = "dispatcher_worker_loop", skip_all)]
async fn dispatcher_worker(
    mut state: DispatchState,
    mut rx: mpsc::Receiver<Command>,
    metrics: Arc<DispatcherMetrics>,
) {
    debug!(
        ratio_threshold = state.ratio_threshold(),
        "Dispatcher worker started"
    );

    let mut stop_waiters = Vec::new();

    while let Some(command) = rx.recv().await {
        if command.is_abandoned() {
            debug!("Skipping request abandoned by its caller");
            continue;
        }

        match command {
            Command::Enqueue { check_in, reply } => {
                let class = check_in.priority_class;
                let record = state.enqueue(check_in);
                metrics.record_check_in(class, &state.snapshot());
                if reply.send(record).is_err() {
                    debug!("Check-in caller left before receiving its service number");
                }
            }
            Command::DequeueNext { reply } => {
                let prev_consecutive_high = state.consecutive_high();
                let record = state.dequeue_next();
                let class = record.as_ref().map(|r| r.priority_class);
                match reply.send(record) {
                    Ok(()) => metrics.record_dequeue(class, &state.snapshot()),
                    // Nobody received it, so the customer is still waiting
                    Err(Some(record)) => state.requeue_front(record, prev_consecutive_high),
                    Err(None) => {}
                }
            }
            Command::FindByKey { key, reply } => {
                let result = state.find_by_key(&key).cloned();
                metrics.record_lookup(result.is_ok());
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(state.snapshot());
            }
            Command::Shutdown { reply } => {
                debug!("Dispatcher worker closing its request channel");
                rx.close();
                stop_waiters.push(reply);
            }
        }
    }

    debug!(
        waiting = state.snapshot().total_waiting(),
        "Dispatcher worker stopped"
    );
    for waiter in stop_waiters {
        let _ = waiter.send(());
    }
}
