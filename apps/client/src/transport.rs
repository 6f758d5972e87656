//! Physical request transport. One call to [`Transport::send`] is one attempt;
//! retries, deadlines and cancellation live in the orchestrator.

use std::error::Error as _;

use async_trait::async_trait;
use bytes::Bytes;
use contracts::TransportFault;
use reqwest::Client;
use tracing::debug;
use url::Url;

pub const TRACE_HEADER: &str = "x-trace-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// One request as the orchestrator hands it to a transport. Reused verbatim
/// by every attempt of the same logical call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the transport's base URL, e.g. `generate/routine`.
    pub path: String,
    pub body: Option<Bytes>,
    pub trace_id: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            trace_id: None,
        }
    }

    pub fn post_json(path: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(Bytes::from(body)),
            trace_id: None,
        }
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

/// Whatever came back, whatever the status. Status interpretation is the
/// orchestrator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFault>;
}

// ────────────────────────────────────────────────────────────────────────────
// reqwest transport
// ────────────────────────────────────────────────────────────────────────────

pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// `base_url` is treated as a directory: `http://host/api` and
    /// `http://host/api/` both resolve `health` to `http://host/api/health`.
    pub fn new(mut base_url: Url) -> Result<Self, reqwest::Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
        })
    }

    fn target(&self, path: &str) -> Result<Url, TransportFault> {
        let target = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportFault::InvalidTarget(format!("{path}: {e}")))?;
        if !matches!(target.scheme(), "http" | "https") {
            return Err(TransportFault::InvalidTarget(format!(
                "unsupported scheme '{}'",
                target.scheme()
            )));
        }
        Ok(target)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFault> {
        let url = self.target(&request.path)?;
        debug!("{:?} {url}", request.method);

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        if let Some(trace_id) = &request.trace_id {
            builder = builder.header(TRACE_HEADER, trace_id);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        let response = builder.send().await.map_err(transport_fault)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_fault)?;

        Ok(RawResponse { status, body })
    }
}

/// Maps a reqwest failure onto the transport fault it represents. reqwest has no
/// typed DNS signal, so failed name lookups land in `Connect` with the rest.
fn transport_fault(e: reqwest::Error) -> TransportFault {
    let detail = describe(&e);
    if e.is_timeout() {
        TransportFault::TimedOut
    } else if e.is_builder() {
        TransportFault::InvalidTarget(detail)
    } else if e.is_connect() || e.is_request() || e.is_body() {
        TransportFault::Connect(detail)
    } else {
        TransportFault::Other(detail)
    }
}

/// The error and its whole source chain, joined. reqwest's own message is
/// usually just "error sending request".
fn describe(e: &reqwest::Error) -> String {
    let mut detail = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        HttpTransport::new(Url::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn test_target_joins_under_base_path() {
        let t = transport("http://localhost:8080/api");
        assert_eq!(
            t.target("generate/routine").unwrap().as_str(),
            "http://localhost:8080/api/generate/routine"
        );
        assert_eq!(
            t.target("/health").unwrap().as_str(),
            "http://localhost:8080/api/health"
        );
    }

    #[test]
    fn test_target_rejects_foreign_scheme() {
        let t = transport("http://localhost:8080/");
        assert!(matches!(
            t.target("mailto:someone@example.com"),
            Err(TransportFault::InvalidTarget(_))
        ));
    }

    #[tokio::test]
    async fn test_refused_connection_is_connect_fault() {
        // Nothing listens on the discard port.
        let t = transport("http://127.0.0.1:9/");
        let fault = t.send(&ApiRequest::get("health")).await.unwrap_err();
        assert!(matches!(fault, TransportFault::Connect(_)), "{fault:?}");
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_connect_fault() {
        // `.invalid` never resolves; name lookup failures share the connect fault.
        let t = transport("http://cadence.invalid/");
        let fault = t.send(&ApiRequest::get("health")).await.unwrap_err();
        assert!(matches!(fault, TransportFault::Connect(_)), "{fault:?}");
    }

    #[test]
    fn test_request_builders() {
        let request = ApiRequest::post_json("reroll/resources", b"{}".to_vec()).with_trace_id("t-1");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
        assert_eq!(request.trace_id.as_deref(), Some("t-1"));
        assert!(ApiRequest::get("health").body.is_none());
    }
}
