//! Axum route handlers for the generation API.
//!
//! Bodies are taken as `Result<Json<_>, JsonRejection>` so a malformed request
//! still answers with the standard error envelope and the request's trace id.

use std::str::FromStr;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use contracts::{GenerateRequest, PrepResponse, RerollRequest, RerollSection, RoutineResponse};

use crate::errors::{AppError, TracedError};
use crate::generation::generator::{generate_prep, generate_routine, reroll_section, RerollOutput};
use crate::state::AppState;
use crate::trace::TraceId;

fn read_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

/// POST /generate/routine
pub async fn handle_generate_routine(
    State(state): State<AppState>,
    trace_id: TraceId,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<RoutineResponse>, TracedError> {
    let outcome = async {
        let request = read_body(body)?;
        generate_routine(&state, &request.profile).await
    }
    .await;

    match outcome {
        Ok(plan) => Ok(Json(RoutineResponse { plan })),
        Err(e) => Err(e.traced(trace_id)),
    }
}

/// POST /generate/prep
pub async fn handle_generate_prep(
    State(state): State<AppState>,
    trace_id: TraceId,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<PrepResponse>, TracedError> {
    let outcome = async {
        let request = read_body(body)?;
        generate_prep(&state, &request.profile).await
    }
    .await;

    match outcome {
        Ok(prep) => Ok(Json(PrepResponse { prep })),
        Err(e) => Err(e.traced(trace_id)),
    }
}

/// POST /reroll/:section
///
/// Responds with only the regenerated section's key. The rest of the plan is
/// context for the model and is never echoed back.
pub async fn handle_reroll(
    State(state): State<AppState>,
    trace_id: TraceId,
    Path(section): Path<String>,
    body: Result<Json<RerollRequest>, JsonRejection>,
) -> Result<Json<RerollOutput>, TracedError> {
    let outcome = async {
        let section = RerollSection::from_str(&section).map_err(|_| {
            AppError::NotFound(format!(
                "Unknown section '{section}'; expected one of timeBlocks, resources, dailyTasks"
            ))
        })?;
        let request = read_body(body)?;
        reroll_section(&state, section, &request).await
    }
    .await;

    outcome.map(Json).map_err(|e| e.traced(trace_id))
}
