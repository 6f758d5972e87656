//! Backoff schedules: the fixed list of waits between attempts of one logical call.
//!
//! A schedule of length N allows N + 1 attempts. Schedules are immutable once
//! built and cheap to clone, so every in-flight call can hold its own handle.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("backoff delay {index} ({current:?}) must be longer than delay {} ({previous:?})", .index - 1)]
    NotIncreasing {
        index: usize,
        previous: Duration,
        current: Duration,
    },

    #[error("backoff delays must be non-zero")]
    ZeroDelay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackoffSchedule {
    delays: Arc<[Duration]>,
}

impl BackoffSchedule {
    /// Builds a schedule from strictly increasing, non-zero delays.
    /// An empty list is valid and means a single attempt.
    pub fn new(delays: Vec<Duration>) -> Result<Self, ScheduleError> {
        if delays.iter().any(Duration::is_zero) {
            return Err(ScheduleError::ZeroDelay);
        }
        for (index, pair) in delays.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ScheduleError::NotIncreasing {
                    index: index + 1,
                    previous: pair[0],
                    current: pair[1],
                });
            }
        }
        Ok(Self {
            delays: delays.into(),
        })
    }

    /// Routine and prep generation: 0.2s, 0.5s, 1.0s.
    pub fn generation() -> Self {
        Self::from_millis(&[200, 500, 1_000])
    }

    /// Section rerolls: 0.5s, 1.0s, 2.0s.
    pub fn reroll() -> Self {
        Self::from_millis(&[500, 1_000, 2_000])
    }

    /// No retries.
    pub fn none() -> Self {
        Self {
            delays: Arc::from(Vec::new()),
        }
    }

    fn from_millis(millis: &[u64]) -> Self {
        Self {
            delays: millis.iter().copied().map(Duration::from_millis).collect(),
        }
    }

    /// Wait before retry number `retry` (0-based), if the schedule allows it.
    pub fn delay(&self, retry: usize) -> Option<Duration> {
        self.delays.get(retry).copied()
    }

    pub fn len(&self) -> usize {
        self.delays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delays.is_empty()
    }

    /// Attempts a retryable call gets under this schedule.
    pub fn max_attempts(&self) -> usize {
        self.delays.len() + 1
    }
}
