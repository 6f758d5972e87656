// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every prompt that produces time blocks.
pub const BUDGET_INSTRUCTION: &str = "\
    Every listed day's time blocks MUST add up to exactly {budget} hours. \
    Durations are decimal hours (0.5 = 30 minutes) and must be positive. \
    Only schedule the user's available days: {days}.";
