//! Content generation: one model call per request, then the reliability pipeline.
//!
//! Flow: validate profile → build prompt → LLM → recover → validate schema →
//!       decode → (plans and time blocks only) normalize to the daily budget.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use contracts::{
    DailyTasksSection, Plan, PlanDraft, PrepPack, Profile, RerollRequest, RerollSection,
    ResourcesSection, TimeBlocksSection,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    DAILY_TASKS_SHAPE, PREP_PROMPT_TEMPLATE, PREP_SYSTEM, REROLL_PROMPT_TEMPLATE, REROLL_SYSTEM,
    RESOURCES_SHAPE, ROUTINE_PROMPT_TEMPLATE, ROUTINE_SYSTEM, TIME_BLOCKS_SHAPE,
};
use crate::llm_client::prompts::{BUDGET_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::pipeline::normalize::{normalize_plan, normalize_schedule};
use crate::pipeline::process_model_output;
use crate::pipeline::schema::ResponseKind;
use crate::state::AppState;

/// Body of a successful reroll: exactly one section key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RerollOutput {
    TimeBlocks(TimeBlocksSection),
    Resources(ResourcesSection),
    DailyTasks(DailyTasksSection),
}

// ────────────────────────────────────────────────────────────────────────────
// Pipelines
// ────────────────────────────────────────────────────────────────────────────

/// Generates a week plan whose days each add up to the profile's budget.
pub async fn generate_routine(state: &AppState, profile: &Profile) -> Result<Plan, AppError> {
    ensure_valid_profile(profile)?;

    let prompt = build_routine_prompt(profile, week_start(Utc::now().date_naive()))?;
    let raw = state.llm.generate(ROUTINE_SYSTEM, &prompt).await?;

    let draft: PlanDraft = process_model_output(
        &raw,
        ResponseKind::Plan,
        &state.schemas,
        state.diagnostics.as_ref(),
    )?;
    let plan = draft.into_plan(state.next_plan_version());
    let plan = normalize_plan(&plan, profile.time_budget_hours_per_day, &state.normalizer);

    info!(
        "Generated plan v{} for week of {} ({} scheduled days)",
        plan.version,
        plan.week_of,
        plan.time_blocks.len()
    );
    Ok(plan)
}

/// Generates an interview prep pack. Structural validation only.
pub async fn generate_prep(state: &AppState, profile: &Profile) -> Result<PrepPack, AppError> {
    ensure_valid_profile(profile)?;

    let prompt = build_prep_prompt(profile)?;
    let raw = state.llm.generate(PREP_SYSTEM, &prompt).await?;

    let prep: PrepPack = process_model_output(
        &raw,
        ResponseKind::PrepPack,
        &state.schemas,
        state.diagnostics.as_ref(),
    )?;

    info!(
        "Generated prep pack: {} outline sections, {} starter questions",
        prep.outline.len(),
        prep.starter_questions.len()
    );
    Ok(prep)
}

/// Regenerates one section of an existing plan and returns only that section.
pub async fn reroll_section(
    state: &AppState,
    section: RerollSection,
    request: &RerollRequest,
) -> Result<RerollOutput, AppError> {
    ensure_valid_profile(&request.profile)?;

    let prompt = build_reroll_prompt(section, request)?;
    let raw = state.llm.generate(REROLL_SYSTEM, &prompt).await?;

    let kind = ResponseKind::Reroll(section);
    let sink = state.diagnostics.as_ref();
    let output = match section {
        RerollSection::TimeBlocks => {
            let parsed: TimeBlocksSection =
                process_model_output(&raw, kind, &state.schemas, sink)?;
            RerollOutput::TimeBlocks(TimeBlocksSection {
                time_blocks: normalize_schedule(
                    &parsed.time_blocks,
                    request.profile.time_budget_hours_per_day,
                    &state.normalizer,
                ),
            })
        }
        RerollSection::Resources => {
            RerollOutput::Resources(process_model_output(&raw, kind, &state.schemas, sink)?)
        }
        RerollSection::DailyTasks => {
            RerollOutput::DailyTasks(process_model_output(&raw, kind, &state.schemas, sink)?)
        }
    };

    info!("Rerolled {section} for plan v{}", request.plan.version);
    Ok(output)
}

fn ensure_valid_profile(profile: &Profile) -> Result<(), AppError> {
    let violations = profile.violations();
    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::schema("Profile", violations))
    }
}

/// Monday of the week containing `today`.
fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

fn profile_json(profile: &Profile) -> Result<String, AppError> {
    serde_json::to_string_pretty(profile)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize profile: {e}")))
}

fn days_list(profile: &Profile) -> String {
    profile
        .available_days
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn budget_instruction(profile: &Profile) -> String {
    BUDGET_INSTRUCTION
        .replace("{budget}", &profile.time_budget_hours_per_day.to_string())
        .replace("{days}", &days_list(profile))
}

fn build_routine_prompt(profile: &Profile, week_of: NaiveDate) -> Result<String, AppError> {
    Ok(ROUTINE_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{budget_instruction}", &budget_instruction(profile))
        .replace("{week_of}", &week_of.to_string())
        .replace("{profile_json}", &profile_json(profile)?))
}

fn build_prep_prompt(profile: &Profile) -> Result<String, AppError> {
    Ok(PREP_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{days}", &days_list(profile))
        .replace("{profile_json}", &profile_json(profile)?))
}

fn build_reroll_prompt(section: RerollSection, request: &RerollRequest) -> Result<String, AppError> {
    let plan_json = serde_json::to_string_pretty(&request.plan)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize plan: {e}")))?;

    let (shape, rules) = match section {
        RerollSection::TimeBlocks => (TIME_BLOCKS_SHAPE, budget_instruction(&request.profile)),
        RerollSection::Resources => (
            RESOURCES_SHAPE,
            "Resource URLs must be absolute http(s) URLs.".to_string(),
        ),
        RerollSection::DailyTasks => (
            DAILY_TASKS_SHAPE,
            format!("Only list tasks for: {}.", days_list(&request.profile)),
        ),
    };

    Ok(REROLL_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_SYSTEM)
        .replace("{section_rules}", &rules)
        .replace("{section_shape}", shape)
        .replace("{section}", section.as_str())
        .replace("{plan_json}", &plan_json)
        .replace("{profile_json}", &profile_json(&request.profile)?))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
