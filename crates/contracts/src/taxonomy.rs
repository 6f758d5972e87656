//! Error taxonomy: the closed set of failure categories a caller can observe.
//!
//! Raw faults are turned into a [`ClassifiedError`] exactly once, by [`classify`],
//! at the boundary where they are first seen. Retry decisions consult
//! [`ClassifiedError::is_retryable`] and nothing else.

use thiserror::Error;

use crate::envelope::ErrorEnvelope;

/// A classified failure. Carries enough to decide retryability and to render
/// a message, never the low-level fault object itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },

    #[error("Failed to decode response: {0}")]
    DecodeFailure(String),

    #[error("Invalid request target: {0}")]
    InvalidTarget(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl ClassifiedError {
    /// Whether another attempt of the same request could succeed.
    ///
    /// Timeouts, connectivity loss and 5xx responses are transient; everything
    /// else fails the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClassifiedError::Timeout | ClassifiedError::NetworkUnavailable(_) => true,
            ClassifiedError::Server { status, .. } => *status >= 500,
            ClassifiedError::DecodeFailure(_)
            | ClassifiedError::InvalidTarget(_)
            | ClassifiedError::Cancelled
            | ClassifiedError::Unknown(_) => false,
        }
    }

    /// Stable, machine-friendly name of the variant (for logs and metrics labels).
    pub fn kind(&self) -> &'static str {
        match self {
            ClassifiedError::NetworkUnavailable(_) => "network_unavailable",
            ClassifiedError::Timeout => "timeout",
            ClassifiedError::Server { .. } => "server",
            ClassifiedError::DecodeFailure(_) => "decode_failure",
            ClassifiedError::InvalidTarget(_) => "invalid_target",
            ClassifiedError::Cancelled => "cancelled",
            ClassifiedError::Unknown(_) => "unknown",
        }
    }
}

/// What a transport reports when it could not produce a response at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportFault {
    /// Connection refused/reset, no route, TLS failure.
    Connect(String),
    /// Host name could not be resolved.
    Dns(String),
    /// The transport's own timer fired.
    TimedOut,
    /// The request URL could not be built or was rejected before sending.
    InvalidTarget(String),
    Other(String),
}

/// A raw fault, as observed at the boundary, before classification.
#[derive(Debug)]
pub enum Fault<'a> {
    Transport(TransportFault),
    /// A response arrived with a status outside 2xx.
    Status { status: u16, body: &'a [u8] },
    /// A 2xx body did not match the expected shape.
    Decode(serde_json::Error),
    /// The per-attempt deadline elapsed before the transport finished.
    DeadlineElapsed,
    Cancelled,
}

/// Total mapping from raw faults to the taxonomy.
pub fn classify(fault: Fault<'_>) -> ClassifiedError {
    match fault {
        Fault::Transport(TransportFault::Connect(detail))
        | Fault::Transport(TransportFault::Dns(detail)) => {
            ClassifiedError::NetworkUnavailable(detail)
        }
        Fault::Transport(TransportFault::TimedOut) | Fault::DeadlineElapsed => {
            ClassifiedError::Timeout
        }
        Fault::Transport(TransportFault::InvalidTarget(detail)) => {
            ClassifiedError::InvalidTarget(detail)
        }
        Fault::Transport(TransportFault::Other(detail)) => ClassifiedError::Unknown(detail),
        Fault::Status { status, body } => ClassifiedError::Server {
            status,
            message: ErrorEnvelope::parse(body).map(|e| e.error),
        },
        Fault::Decode(e) => ClassifiedError::DecodeFailure(e.to_string()),
        Fault::Cancelled => ClassifiedError::Cancelled,
    }
}
