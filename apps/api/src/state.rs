use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::pipeline::normalize::NormalizerConfig;
use crate::pipeline::recovery::{DiagnosticSink, TracingSink};
use crate::pipeline::schema::SchemaRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model backend. `LlmClient` in production, canned output in tests.
    pub llm: Arc<dyn TextGenerator>,
    /// Compiled once at startup; read-only afterwards.
    pub schemas: Arc<SchemaRegistry>,
    pub diagnostics: Arc<dyn DiagnosticSink>,
    pub normalizer: NormalizerConfig,
    plan_versions: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        schemas: Arc<SchemaRegistry>,
        normalizer: NormalizerConfig,
    ) -> Self {
        Self {
            llm,
            schemas,
            diagnostics: Arc::new(TracingSink),
            normalizer,
            plan_versions: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Next plan version. Strictly increasing for the life of the process.
    pub fn next_plan_version(&self) -> u64 {
        self.plan_versions.fetch_add(1, Ordering::Relaxed) + 1
    }
}
