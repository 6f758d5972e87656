// Routine, prep pack and reroll generation.
// All LLM calls go through llm_client; all model output goes through pipeline.

pub mod generator;
pub mod handlers;
pub mod prompts;
