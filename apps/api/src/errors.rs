use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contracts::{ErrorEnvelope, Violation};
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::pipeline::recovery::RecoveryError;
use crate::trace::{TraceId, TRACE_HEADER};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request body could not be read as the expected JSON shape.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A document broke its contract. Carries every violation, not just the first.
    #[error("{subject} failed schema validation ({} violations)", .violations.len())]
    Schema {
        subject: String,
        violations: Vec<Violation>,
    },

    /// Model output that neither parsed nor survived repair.
    #[error(transparent)]
    Unrecoverable(#[from] RecoveryError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn schema(subject: impl Into<String>, violations: Vec<Violation>) -> Self {
        AppError::Schema {
            subject: subject.into(),
            violations,
        }
    }

    /// Attaches the request's trace id so it is echoed in the error envelope.
    pub fn traced(self, trace_id: TraceId) -> TracedError {
        TracedError {
            trace_id,
            error: self,
        }
    }

    fn into_envelope(self) -> (StatusCode, ErrorEnvelope) {
        let (status, message, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Schema {
                subject,
                violations,
            } => {
                tracing::warn!(
                    "{subject} failed schema validation with {} violations",
                    violations.len()
                );
                (
                    StatusCode::BAD_REQUEST,
                    format!("{subject} failed schema validation"),
                    serde_json::to_value(&violations).ok(),
                )
            }
            AppError::Unrecoverable(e) => {
                tracing::error!(
                    "Unrecoverable model output: {e}; snippet: {:?}",
                    e.snippet
                );
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "The model returned output that could not be parsed".to_string(),
                    None,
                )
            }
            AppError::Llm(e) => {
                tracing::error!("LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "An AI processing error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        (
            status,
            ErrorEnvelope {
                error: message,
                details,
                trace_id: None,
            },
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, envelope) = self.into_envelope();
        (status, Json(envelope)).into_response()
    }
}

/// An [`AppError`] bound to the trace id of the request that produced it.
#[derive(Debug)]
pub struct TracedError {
    pub trace_id: TraceId,
    pub error: AppError,
}

impl IntoResponse for TracedError {
    fn into_response(self) -> Response {
        let (status, mut envelope) = self.error.into_envelope();
        envelope.trace_id = Some(self.trace_id.0.clone());

        let mut response = (status, Json(envelope)).into_response();
        if let Ok(value) = HeaderValue::from_str(&self.trace_id.0) {
            response.headers_mut().insert(TRACE_HEADER, value);
        }
        response
    }
}
