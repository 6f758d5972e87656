//! Request orchestrator: turns one logical call into 1..N physical attempts.
//!
//! Per logical call:
//!
//! ```text
//! idle → attempting ─┬─ 2xx + decodes ───────────────→ succeeded
//!          ↑         ├─ retryable, schedule left ──→ retry-wait ─┐
//!          │         └─ terminal / exhausted / cancelled → failed │
//!          └──────────────────────────────────────────────────────┘
//! ```
//!
//! Each attempt races the transport against the per-attempt deadline with
//! `tokio::time::timeout`; the dropped transport future is the cancelled loser.
//! Cancellation is checked first in every `select!`, so a cancel that is ready
//! alongside a result always wins.

use std::sync::Arc;
use std::time::Duration;

use contracts::{classify, ClassifiedError, Fault};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::schedule::BackoffSchedule;
use crate::transport::{ApiRequest, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Attempting { attempt: usize },
    RetryWait { attempt: usize, delay: Duration },
    Succeeded,
    Failed,
}

/// One logical request: what to send, whether it may be retried, and how long
/// to wait between attempts.
#[derive(Debug, Clone)]
pub struct LogicalCall {
    pub request: ApiRequest,
    pub retryable: bool,
    pub schedule: BackoffSchedule,
}

impl LogicalCall {
    pub fn retryable(request: ApiRequest, schedule: BackoffSchedule) -> Self {
        Self {
            request,
            retryable: true,
            schedule,
        }
    }

    /// Exactly one attempt, whatever the failure.
    pub fn once(request: ApiRequest) -> Self {
        Self {
            request,
            retryable: false,
            schedule: BackoffSchedule::none(),
        }
    }

    fn max_attempts(&self) -> usize {
        if self.retryable {
            self.schedule.max_attempts()
        } else {
            1
        }
    }
}

/// Tracks one call's state and logs each transition.
struct Progress<'a> {
    path: &'a str,
    state: RequestState,
}

impl Progress<'_> {
    fn enter(&mut self, next: RequestState) {
        debug!(path = %self.path, from = ?self.state, to = ?next, "request state");
        self.state = next;
    }

    fn fail(&mut self, error: ClassifiedError) -> ClassifiedError {
        self.enter(RequestState::Failed);
        match &error {
            ClassifiedError::Cancelled => info!(path = %self.path, "request cancelled"),
            other => warn!(path = %self.path, kind = other.kind(), "request failed: {other}"),
        }
        error
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    transport: Arc<dyn Transport>,
    attempt_timeout: Duration,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn Transport>, attempt_timeout: Duration) -> Self {
        Self {
            transport,
            attempt_timeout,
        }
    }

    /// Runs `call` to a single outcome. Errors are always classified; on
    /// failure after retries the LAST attempt's error is returned.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        call: &LogicalCall,
        cancel: &CancellationToken,
    ) -> Result<R, ClassifiedError> {
        let mut progress = Progress {
            path: &call.request.path,
            state: RequestState::Idle,
        };
        let max_attempts = call.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            progress.enter(RequestState::Attempting { attempt });

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(progress.fail(classify(Fault::Cancelled))),
                outcome = tokio::time::timeout(self.attempt_timeout, self.transport.send(&call.request)) => outcome,
            };

            let error = match outcome {
                Err(_elapsed) => classify(Fault::DeadlineElapsed),
                Ok(Err(fault)) => classify(Fault::Transport(fault)),
                Ok(Ok(response)) if !(200..300).contains(&response.status) => {
                    classify(Fault::Status {
                        status: response.status,
                        body: &response.body,
                    })
                }
                Ok(Ok(response)) => {
                    // A cancel that raced the response still wins.
                    if cancel.is_cancelled() {
                        return Err(progress.fail(classify(Fault::Cancelled)));
                    }
                    return match serde_json::from_slice::<R>(&response.body) {
                        Ok(decoded) => {
                            progress.enter(RequestState::Succeeded);
                            Ok(decoded)
                        }
                        Err(e) => Err(progress.fail(classify(Fault::Decode(e)))),
                    };
                }
            };

            let delay = match call.schedule.delay(attempt - 1) {
                Some(delay) if error.is_retryable() && attempt < max_attempts => delay,
                _ => return Err(progress.fail(error)),
            };

            debug!(
                path = %call.request.path,
                attempt,
                kind = error.kind(),
                "attempt failed, retrying in {delay:?}: {error}"
            );
            progress.enter(RequestState::RetryWait { attempt, delay });

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(progress.fail(classify(Fault::Cancelled))),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }
}
