//! HTTP request handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::debug;

use contracts::{PolicyConfig, ServiceQueue, ServiceRecord};
use dispatcher::{AnyDispatcher, DispatcherMetrics};

use crate::error::ApiError;
use crate::types::{CheckInRequest, CheckInResponse, StatsResponse};

/// Shared application state
pub struct AppState<Q> {
    pub queue: Q,
    pub metrics: Arc<DispatcherMetrics>,
    pub policy: PolicyConfig,
}

impl<Q: ServiceQueue> AppState<Q> {
    pub fn new(queue: Q, metrics: Arc<DispatcherMetrics>, policy: PolicyConfig) -> Self {
        Self {
            queue,
            metrics,
            policy,
        }
    }
}

impl AppState<AnyDispatcher> {
    /// Wrap a front-end built by `dispatcher::create_dispatcher`
    pub fn from_dispatcher(dispatcher: AnyDispatcher, policy: PolicyConfig) -> Self {
        let metrics = Arc::clone(dispatcher.metrics());
        Self::new(dispatcher, metrics, policy)
    }
}

/// POST /scheduler/checkIn
pub async fn check_in<Q: ServiceQueue + Sync>(
    State(state): State<Arc<AppState<Q>>>,
    payload: Result<Json<CheckInRequest>, JsonRejection>,
) -> Result<Json<CheckInResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let check_in = request.into_check_in()?;

    let record = state.queue.enqueue(check_in).await?;
    Ok(Json(CheckInResponse::from(record)))
}

/// GET /scheduler/nextCustomer
pub async fn next_customer<Q: ServiceQueue + Sync>(
    State(state): State<Arc<AppState<Q>>>,
) -> Result<Json<ServiceRecord>, ApiError> {
    match state.queue.dequeue_next().await? {
        Some(record) => Ok(Json(record)),
        None => {
            debug!("Next customer requested with empty queues");
            Err(ApiError::QueueEmpty)
        }
    }
}

/// GET /scheduler/findCustomer/:contact_key
pub async fn find_customer<Q: ServiceQueue + Sync>(
    State(state): State<Arc<AppState<Q>>>,
    Path(contact_key): Path<String>,
) -> Result<Json<ServiceRecord>, ApiError> {
    let record = state.queue.find_by_key(&contact_key).await?;
    Ok(Json(record))
}

/// GET /scheduler/stats
pub async fn get_stats<Q: ServiceQueue + Sync>(
    State(state): State<Arc<AppState<Q>>>,
) -> Result<Json<StatsResponse>, ApiError> {
    let queue = state.queue.snapshot().await?;
    Ok(Json(StatsResponse {
        mode: state.policy.mode,
        ratio_threshold: state.policy.ratio_threshold,
        queue,
        counters: state.metrics.snapshot(),
    }))
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
