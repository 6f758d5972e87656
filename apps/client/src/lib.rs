//! Cadence API client.
//!
//! [`CadenceClient`] exposes one async method per endpoint. Each method is a
//! single logical call run through the [`Orchestrator`]: it gets its own trace
//! id, its own backoff schedule and a caller-owned [`CancellationToken`], and
//! resolves to either the decoded payload or exactly one [`ClassifiedError`].

pub mod orchestrator;
pub mod schedule;
pub mod transport;

#[cfg(test)]
mod test_support;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use contracts::{
    ClassifiedError, DailyTasksSection, HealthResponse, Plan, PrepPack, PrepResponse, Profile,
    RerollRequest, RerollSection, ResourcesSection, RoutineResponse, TimeBlocksSection,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;
use uuid::Uuid;

pub use orchestrator::{LogicalCall, Orchestrator, RequestState};
pub use schedule::{BackoffSchedule, ScheduleError};
pub use transport::{ApiRequest, HttpTransport, RawResponse, Transport};

const DEFAULT_API_URL: &str = "http://localhost:8080/";
/// Kept above the server's 55s model-call timeout.
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub attempt_timeout: Duration,
    /// Routine and prep generation.
    pub generation_schedule: BackoffSchedule,
    pub reroll_schedule: BackoffSchedule,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            attempt_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
            generation_schedule: BackoffSchedule::generation(),
            reroll_schedule: BackoffSchedule::reroll(),
        }
    }
}

impl ClientConfig {
    /// Reads `CADENCE_API_URL` and `CADENCE_ATTEMPT_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mut config = Self::default();
        if let Ok(raw) = std::env::var("CADENCE_API_URL") {
            Url::parse(&raw).with_context(|| format!("CADENCE_API_URL is not a URL: '{raw}'"))?;
            config.base_url = raw;
        }
        if let Ok(raw) = std::env::var("CADENCE_ATTEMPT_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .with_context(|| format!("CADENCE_ATTEMPT_TIMEOUT_SECS must be whole seconds, got '{raw}'"))?;
            anyhow::ensure!(secs > 0, "CADENCE_ATTEMPT_TIMEOUT_SECS must be positive");
            config.attempt_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

#[derive(Clone)]
pub struct CadenceClient {
    orchestrator: Orchestrator,
    config: ClientConfig,
}

impl CadenceClient {
    /// Client over HTTP.
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid API base URL '{}'", config.base_url))?;
        let transport = HttpTransport::new(base_url).context("Failed to build HTTP client")?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self {
            orchestrator: Orchestrator::new(transport, config.attempt_timeout),
            config,
        }
    }

    pub async fn generate_routine(
        &self,
        profile: &Profile,
        cancel: &CancellationToken,
    ) -> Result<Plan, ClassifiedError> {
        let request = post("generate/routine", &ProfileBody { profile })?;
        let call = LogicalCall::retryable(request, self.config.generation_schedule.clone());
        let response: RoutineResponse = self.orchestrator.execute(&call, cancel).await?;
        Ok(response.plan)
    }

    pub async fn generate_prep(
        &self,
        profile: &Profile,
        cancel: &CancellationToken,
    ) -> Result<PrepPack, ClassifiedError> {
        let request = post("generate/prep", &ProfileBody { profile })?;
        let call = LogicalCall::retryable(request, self.config.generation_schedule.clone());
        let response: PrepResponse = self.orchestrator.execute(&call, cancel).await?;
        Ok(response.prep)
    }

    pub async fn reroll_time_blocks(
        &self,
        request: &RerollRequest,
        cancel: &CancellationToken,
    ) -> Result<TimeBlocksSection, ClassifiedError> {
        self.reroll(RerollSection::TimeBlocks, request, cancel).await
    }

    pub async fn reroll_resources(
        &self,
        request: &RerollRequest,
        cancel: &CancellationToken,
    ) -> Result<ResourcesSection, ClassifiedError> {
        self.reroll(RerollSection::Resources, request, cancel).await
    }

    pub async fn reroll_daily_tasks(
        &self,
        request: &RerollRequest,
        cancel: &CancellationToken,
    ) -> Result<DailyTasksSection, ClassifiedError> {
        self.reroll(RerollSection::DailyTasks, request, cancel).await
    }

    /// Liveness check. Never retried: a failing health check should say so at once.
    pub async fn health(&self, cancel: &CancellationToken) -> Result<HealthResponse, ClassifiedError> {
        let call = LogicalCall::once(traced(ApiRequest::get("health")));
        self.orchestrator.execute(&call, cancel).await
    }

    async fn reroll<R: serde::de::DeserializeOwned>(
        &self,
        section: RerollSection,
        request: &RerollRequest,
        cancel: &CancellationToken,
    ) -> Result<R, ClassifiedError> {
        let request = post(&format!("reroll/{section}"), request)?;
        let call = LogicalCall::retryable(request, self.config.reroll_schedule.clone());
        self.orchestrator.execute(&call, cancel).await
    }
}

#[derive(Serialize)]
struct ProfileBody<'a> {
    profile: &'a Profile,
}

/// Serializes the body once; every attempt resends the same bytes and trace id.
fn post<B: Serialize>(path: &str, body: &B) -> Result<ApiRequest, ClassifiedError> {
    let bytes = serde_json::to_vec(body)
        .map_err(|e| ClassifiedError::Unknown(format!("Failed to encode request body: {e}")))?;
    Ok(traced(ApiRequest::post_json(path, bytes)))
}

fn traced(request: ApiRequest) -> ApiRequest {
    request.with_trace_id(Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use contracts::{TimeBlock, Weekday};
    use std::collections::BTreeMap;

    use super::*;
    use crate::test_support::{ScriptedTransport, Step};
    use crate::transport::Method;

    fn client(transport: Arc<ScriptedTransport>) -> CadenceClient {
        CadenceClient::with_transport(transport, ClientConfig::default())
    }

    fn profile() -> Profile {
        Profile {
            name: "Ada".to_string(),
            stage: "interviewing".to_string(),
            target_role: "Backend Engineer".to_string(),
            time_budget_hours_per_day: 2.0,
            available_days: vec![Weekday::Mon],
            constraints: None,
        }
    }

    fn plan() -> Plan {
        let mut time_blocks = BTreeMap::new();
        time_blocks.insert(
            Weekday::Mon,
            vec![TimeBlock {
                label: "Mock interview".to_string(),
                hours: 2.0,
            }],
        );
        Plan {
            week_of: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            time_blocks,
            daily_tasks: BTreeMap::new(),
            milestones: vec![],
            resources: vec![],
            version: 7,
        }
    }

    const ROUTINE_BODY: &str = r#"{"plan": {
        "weekOf": "2026-10-19",
        "timeBlocks": {"Mon": [{"label": "Mock interview", "hours": 2.0}]},
        "dailyTasks": {},
        "milestones": [],
        "resources": [],
        "version": 7
    }}"#;

    #[tokio::test(start_paused = true)]
    async fn test_generate_routine_retries_then_decodes() {
        let transport = ScriptedTransport::new(vec![
            Step::Respond(502, r#"{"error": "An AI processing error occurred"}"#),
            Step::Respond(200, ROUTINE_BODY),
        ]);

        let plan_out = client(transport.clone())
            .generate_routine(&profile(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(plan_out, plan());
        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].path, "generate/routine");
        assert_eq!(requests[0].method, Method::Post);
        // Same logical call, same trace id and body on every attempt.
        assert_eq!(requests[0], requests[1]);

        let body: serde_json::Value =
            serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body["profile"]["targetRole"], "Backend Engineer");
    }

    #[tokio::test(start_paused = true)]
    async fn test_reroll_uses_section_path_and_schedule() {
        let transport = ScriptedTransport::new(vec![
            Step::Fail(contracts::TransportFault::Connect("refused".to_string())),
            Step::Respond(200, r#"{"dailyTasks": {"Mon": ["Two graph problems"]}}"#),
        ]);
        let request = RerollRequest {
            profile: profile(),
            plan: plan(),
        };
        let started = tokio::time::Instant::now();

        let section = client(transport.clone())
            .reroll_daily_tasks(&request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(section.daily_tasks[&Weekday::Mon], vec!["Two graph problems"]);
        assert_eq!(transport.requests.lock().unwrap()[0].path, "reroll/dailyTasks");
        // Reroll schedule: first wait is 0.5s.
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_is_not_retried() {
        let transport = ScriptedTransport::always(Step::Respond(503, "{}"));

        let err = client(transport.clone())
            .health(&CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err, ClassifiedError::Server { status: 503, message: None });
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_payload_shape_is_decode_failure() {
        let transport = ScriptedTransport::always(Step::Respond(200, r#"{"prep": null}"#));

        let err = client(transport.clone())
            .generate_prep(&profile(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ClassifiedError::DecodeFailure(_)));
        assert_eq!(transport.attempts(), 1);
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/");
        assert_eq!(config.attempt_timeout, Duration::from_secs(60));
        assert_eq!(config.generation_schedule, BackoffSchedule::generation());
        assert_eq!(config.reroll_schedule, BackoffSchedule::reroll());
    }
}
