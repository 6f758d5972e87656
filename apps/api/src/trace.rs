//! Request correlation. Every request gets an opaque trace id: the caller's
//! `x-trace-id` header when present, a fresh UUID otherwise. The id is echoed
//! on the response and in error envelopes and has no other effect.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const TRACE_HEADER: &str = "x-trace-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

impl TraceId {
    fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(TRACE_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        TraceId(id)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for TraceId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(TraceId::from_headers(&parts.headers))
    }
}

/// Middleware: pins the trace id on the request so handlers and the response agree on it.
pub async fn propagate_trace_id(mut request: Request, next: Next) -> Response {
    let trace_id = TraceId::from_headers(request.headers());
    let Ok(value) = HeaderValue::from_str(&trace_id.0) else {
        return next.run(request).await;
    };

    request.headers_mut().insert(TRACE_HEADER, value.clone());
    let mut response = next.run(request).await;
    response.headers_mut().insert(TRACE_HEADER, value);
    response
}
