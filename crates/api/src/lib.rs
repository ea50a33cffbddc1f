//! # API
//!
//! HTTP transport for the service scheduler.
//!
//! Routes:
//! - `POST /scheduler/checkIn`
//! - `GET  /scheduler/nextCustomer`
//! - `GET  /scheduler/findCustomer/:contact_key`
//! - `GET  /scheduler/stats`
//! - `GET  /health`

pub mod error;
pub mod handlers;
pub mod types;

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use contracts::{ServerSettings, ServiceQueue};

pub use error::{ApiError, ErrorResponse};
pub use handlers::AppState;
pub use types::{CheckInRequest, CheckInResponse, StatsResponse};

/// Creates the API router
pub fn create_router<Q: ServiceQueue + Sync + 'static>(state: Arc<AppState<Q>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/scheduler/checkIn", post(handlers::check_in::<Q>))
        .route("/scheduler/nextCustomer", get(handlers::next_customer::<Q>))
        .route(
            "/scheduler/findCustomer/:contact_key",
            get(handlers::find_customer::<Q>),
        )
        .route("/scheduler/stats", get(handlers::get_stats::<Q>))
        .with_state(state)
}

/// Bind `host:port` and serve until `shutdown` resolves
pub async fn start_server<Q, F>(
    config: &ServerSettings,
    state: Arc<AppState<Q>>,
    shutdown: F,
) -> std::io::Result<()>
where
    Q: ServiceQueue + Sync + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state);
    let addr = format!("{}:{}", config.host, config.port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
