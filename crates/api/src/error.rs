//! API error type and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use contracts::SchedulerError;

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Errors surfaced by HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// Payload failed field validation (blank name or contact key)
    #[error("invalid customer details: {0}")]
    Validation(String),

    /// Body is not the expected JSON
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// Nobody waiting when the next customer was requested
    #[error("no customers in the queue")]
    QueueEmpty,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Scheduler(SchedulerError::InvalidClass { .. })
            | Self::Scheduler(SchedulerError::InvalidKey)
            | Self::Validation(_)
            | Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::Scheduler(SchedulerError::NotFound { .. }) | Self::QueueEmpty => {
                StatusCode::NOT_FOUND
            }
            Self::Scheduler(SchedulerError::Unavailable { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Scheduler(SchedulerError::InvalidClass { .. }) => "INVALID_PRIORITY_CLASS",
            Self::Scheduler(SchedulerError::InvalidKey) => "INVALID_CONTACT_KEY",
            Self::Scheduler(SchedulerError::NotFound { .. }) => "CUSTOMER_NOT_FOUND",
            Self::Scheduler(SchedulerError::Unavailable { .. }) => "DISPATCHER_UNAVAILABLE",
            Self::Validation(_) => "INVALID_CUSTOMER",
            Self::MalformedBody(_) => "MALFORMED_BODY",
            Self::QueueEmpty => "QUEUE_EMPTY",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        } else if status == StatusCode::BAD_REQUEST {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        };
        (status, Json(body)).into_response()
    }
}
