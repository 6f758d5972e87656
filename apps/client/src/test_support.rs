//! Scripted transport for orchestrator and client tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use contracts::TransportFault;
use tokio_util::sync::CancellationToken;

use crate::transport::{ApiRequest, RawResponse, Transport};

/// What the scripted transport does on one attempt.
#[derive(Debug, Clone)]
pub enum Step {
    Respond(u16, &'static str),
    Fail(TransportFault),
    /// Never completes; only a deadline or cancellation ends the attempt.
    Hang,
    /// Cancels the token while the attempt is in flight, then responds anyway.
    CancelThenRespond(CancellationToken, u16, &'static str),
}

/// Plays `steps` in order, then repeats the last one forever.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    last: Step,
    attempts: AtomicUsize,
    pub requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Arc<Self> {
        let last = steps.last().cloned().unwrap_or(Step::Hang);
        Arc::new(Self {
            steps: Mutex::new(steps.into()),
            last,
            attempts: AtomicUsize::new(0),
            requests: Mutex::default(),
        })
    }

    pub fn always(step: Step) -> Arc<Self> {
        Self::new(vec![step])
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFault> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone());

        match step {
            Step::Respond(status, body) => Ok(RawResponse {
                status,
                body: Bytes::from_static(body.as_bytes()),
            }),
            Step::Fail(fault) => Err(fault),
            Step::Hang => std::future::pending().await,
            Step::CancelThenRespond(token, status, body) => {
                token.cancel();
                Ok(RawResponse {
                    status,
                    body: Bytes::from_static(body.as_bytes()),
                })
            }
        }
    }
}
