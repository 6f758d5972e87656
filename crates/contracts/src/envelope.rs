use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every non-2xx response from the API.
///
/// `details` is only populated for validation failures, where it carries
/// the full list of [`Violation`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// A single contract violation: where it happened and which rule it broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON pointer into the offending document, e.g. `/timeBlocks/Mon/0/hours`.
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ErrorEnvelope {
    /// Parses an envelope out of a raw error body. Returns `None` for bodies
    /// that are not envelopes (HTML error pages, empty bodies, ...).
    pub fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice(body).ok()
    }
}
