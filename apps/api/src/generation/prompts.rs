// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for weekly routine generation.
pub const ROUTINE_SYSTEM: &str = "You are a career coach who plans realistic, \
    focused study weeks for people preparing for a new role. \
    You MUST respond with valid JSON only: a single JSON object.";

/// Routine prompt template.
/// Replace: {json_only}, {budget_instruction}, {week_of}, {profile_json}
pub const ROUTINE_PROMPT_TEMPLATE: &str = r#"{json_only}

{budget_instruction}

Plan the week starting {week_of} for this person:
{profile_json}

Return a JSON object with this EXACT schema (no extra fields):
{
  "weekOf": "{week_of}",
  "timeBlocks": { "Mon": [{"label": "System design reading", "hours": 1.0}] },
  "dailyTasks": { "Mon": ["Read chapter 3 of DDIA"] },
  "milestones": ["Complete two mock interviews"],
  "resources": [{"title": "Designing Data-Intensive Applications", "url": "https://dataintensive.net"}]
}

Day keys are exactly "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun".
Resource URLs must be absolute http(s) URLs."#;

/// System prompt for interview prep packs.
pub const PREP_SYSTEM: &str = "You are an interview coach who writes concise, \
    role-specific preparation material. \
    You MUST respond with valid JSON only: a single JSON object.";

/// Prep pack prompt template.
/// Replace: {json_only}, {days}, {profile_json}
pub const PREP_PROMPT_TEMPLATE: &str = r#"{json_only}

Write an interview preparation pack for this person:
{profile_json}

Return a JSON object with this EXACT schema (no extra fields):
{
  "outline": [{"name": "Behavioral", "items": ["Prepare three STAR stories"]}],
  "drills": { "Mon": ["Explain a production incident you owned"] },
  "starterQuestions": ["Walk me through a system you designed"],
  "resources": [{"title": "Tech Interview Handbook", "url": "https://www.techinterviewhandbook.org"}]
}

Only include drills for these days: {days}.
Resource URLs must be absolute http(s) URLs."#;

/// System prompt for single-section rerolls.
pub const REROLL_SYSTEM: &str = "You are a career coach revising one section of an \
    existing weekly plan. Keep everything consistent with the rest of the plan. \
    You MUST respond with valid JSON only: a single JSON object.";

/// Reroll prompt template.
/// Replace: {json_only}, {section_rules}, {section}, {section_shape}, {plan_json}, {profile_json}
pub const REROLL_PROMPT_TEMPLATE: &str = r#"{json_only}

{section_rules}

Regenerate ONLY the "{section}" section of this plan with fresh content:
{plan_json}

The plan belongs to:
{profile_json}

Return a JSON object with exactly one key, "{section}":
{section_shape}"#;

pub const TIME_BLOCKS_SHAPE: &str =
    r#"{ "timeBlocks": { "Mon": [{"label": "Mock interview", "hours": 1.5}] } }"#;
pub const RESOURCES_SHAPE: &str =
    r#"{ "resources": [{"title": "Rust book", "url": "https://doc.rust-lang.org/book/"}] }"#;
pub const DAILY_TASKS_SHAPE: &str = r#"{ "dailyTasks": { "Mon": ["Solve two graph problems"] } }"#;
