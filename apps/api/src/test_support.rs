//! Canned model backend for handler and generator tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contracts::{Profile, Weekday};

use crate::llm_client::{LlmError, TextGenerator};
use crate::pipeline::normalize::NormalizerConfig;
use crate::pipeline::schema::SchemaRegistry;
use crate::state::AppState;

/// Replays queued responses in order and remembers every prompt it was sent.
#[derive(Default)]
pub struct CannedGenerator {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    pub fn with(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::default(),
        })
    }

    pub fn text(raw: &str) -> Arc<Self> {
        Self::with(vec![Ok(raw.to_string())])
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

pub fn state_with(generator: Arc<CannedGenerator>) -> AppState {
    AppState::new(
        generator,
        Arc::new(SchemaRegistry::compile().unwrap()),
        NormalizerConfig::default(),
    )
}

pub fn profile() -> Profile {
    Profile {
        name: "Ada".to_string(),
        stage: "interviewing".to_string(),
        target_role: "Backend Engineer".to_string(),
        time_budget_hours_per_day: 2.5,
        available_days: vec![Weekday::Mon, Weekday::Wed],
        constraints: Some("No weekends".to_string()),
    }
}

/// A model plan whose Monday adds up to 3h instead of the 2.5h budget.
pub const PLAN_OVER_BUDGET: &str = r#"{
    "weekOf": "2026-10-19",
    "timeBlocks": {
        "Mon": [
            {"label": "Mock interview", "hours": 1.0},
            {"label": "System design", "hours": 1.0},
            {"label": "Reading", "hours": 1.0}
        ],
        "Wed": [{"label": "Leetcode", "hours": 2.5}]
    },
    "dailyTasks": {"Mon": ["Book a mock interview"], "Wed": ["Two graph problems"]},
    "milestones": ["Finish the caching chapter"],
    "resources": [{"title": "DDIA", "url": "https://dataintensive.net"}]
}"#;
