use axum::Json;
use contracts::HealthResponse;

/// GET /health
/// Liveness only. Never touches the model.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        service: Some("cadence-api".to_string()),
    })
}
