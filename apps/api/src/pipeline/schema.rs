//! Schema Validator: the response contract for every kind of model output.
//!
//! Schemas are compiled once, when the [`SchemaRegistry`] is built at startup,
//! and shared read-only across requests afterwards.

use anyhow::{anyhow, Result};
use contracts::{RerollSection, Violation, Weekday};
use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Map, Value};

/// The kinds of document the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Plan,
    PrepPack,
    Reroll(RerollSection),
}

impl ResponseKind {
    /// Human-readable name used in error messages.
    pub fn subject(&self) -> &'static str {
        match self {
            ResponseKind::Plan => "Plan",
            ResponseKind::PrepPack => "Prep pack",
            ResponseKind::Reroll(RerollSection::TimeBlocks) => "Time blocks section",
            ResponseKind::Reroll(RerollSection::Resources) => "Resources section",
            ResponseKind::Reroll(RerollSection::DailyTasks) => "Daily tasks section",
        }
    }
}

/// Compiled validators, one per [`ResponseKind`].
pub struct SchemaRegistry {
    plan: JSONSchema,
    prep: JSONSchema,
    time_blocks: JSONSchema,
    resources: JSONSchema,
    daily_tasks: JSONSchema,
}

impl SchemaRegistry {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            plan: compile_schema("Plan", &plan_schema())?,
            prep: compile_schema("PrepPack", &prep_schema())?,
            time_blocks: compile_schema(
                "timeBlocks",
                &section_schema("timeBlocks", day_map(time_block_schema())),
            )?,
            resources: compile_schema(
                "resources",
                &section_schema("resources", resources_schema()),
            )?,
            daily_tasks: compile_schema(
                "dailyTasks",
                &section_schema("dailyTasks", day_map(non_empty_string())),
            )?,
        })
    }

    /// Validates `instance` and returns every violation, not just the first.
    pub fn validate(&self, kind: ResponseKind, instance: &Value) -> Result<(), Vec<Violation>> {
        let schema = match kind {
            ResponseKind::Plan => &self.plan,
            ResponseKind::PrepPack => &self.prep,
            ResponseKind::Reroll(RerollSection::TimeBlocks) => &self.time_blocks,
            ResponseKind::Reroll(RerollSection::Resources) => &self.resources,
            ResponseKind::Reroll(RerollSection::DailyTasks) => &self.daily_tasks,
        };

        match schema.validate(instance) {
            Ok(()) => Ok(()),
            Err(errors) => Err(errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    let path = if path.is_empty() { "/".to_string() } else { path };
                    Violation::new(path, e.to_string())
                })
                .collect()),
        }
    }
}

fn compile_schema(name: &str, schema: &Value) -> Result<JSONSchema> {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema)
        .map_err(|e| anyhow!("Failed to compile {name} schema: {e}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Schema documents
// ────────────────────────────────────────────────────────────────────────────

fn non_empty_string() -> Value {
    json!({ "type": "string", "minLength": 1 })
}

fn string_list() -> Value {
    json!({ "type": "array", "items": non_empty_string() })
}

fn time_block_schema() -> Value {
    json!({
        "type": "object",
        "required": ["label", "hours"],
        "additionalProperties": false,
        "properties": {
            "label": non_empty_string(),
            "hours": { "type": "number", "exclusiveMinimum": 0 }
        }
    })
}

fn resources_schema() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "required": ["title", "url"],
            "additionalProperties": false,
            "properties": {
                "title": non_empty_string(),
                "url": { "type": "string", "format": "uri", "pattern": "^https?://" }
            }
        }
    })
}

/// Object keyed by weekday; any other key is rejected.
fn day_map(item: Value) -> Value {
    let properties: Map<String, Value> = Weekday::ALL
        .iter()
        .map(|day| {
            (
                day.as_str().to_string(),
                json!({ "type": "array", "items": item.clone() }),
            )
        })
        .collect();

    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": properties
    })
}

fn strict_object(required: &[&str], properties: Value) -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": required,
        "additionalProperties": false,
        "properties": properties
    })
}

fn plan_schema() -> Value {
    strict_object(
        &["weekOf", "timeBlocks", "dailyTasks", "milestones", "resources"],
        json!({
            "weekOf": {
                "type": "string",
                "format": "date",
                "pattern": "^[0-9]{4}-[0-9]{2}-[0-9]{2}$"
            },
            "timeBlocks": day_map(time_block_schema()),
            "dailyTasks": day_map(non_empty_string()),
            "milestones": string_list(),
            "resources": resources_schema()
        }),
    )
}

fn prep_schema() -> Value {
    strict_object(
        &["outline", "drills", "starterQuestions", "resources"],
        json!({
            "outline": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name", "items"],
                    "additionalProperties": false,
                    "properties": {
                        "name": non_empty_string(),
                        "items": string_list()
                    }
                }
            },
            "drills": day_map(non_empty_string()),
            "starterQuestions": string_list(),
            "resources": resources_schema()
        }),
    )
}

fn section_schema(key: &str, body: Value) -> Value {
    let mut properties = Map::new();
    properties.insert(key.to_string(), body);
    strict_object(&[key], Value::Object(properties))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::compile().unwrap()
    }

    fn valid_plan() -> Value {
        json!({
            "weekOf": "2026-10-19",
            "timeBlocks": {
                "Mon": [{"label": "Mock interview", "hours": 1.0}, {"label": "Reading", "hours": 1.0}],
                "Wed": []
            },
            "dailyTasks": { "Mon": ["Review notes"] },
            "milestones": ["Two mock interviews"],
            "resources": [{"title": "Rust book", "url": "https://doc.rust-lang.org/book/"}]
        })
    }

    fn paths(violations: &[Violation]) -> Vec<&str> {
        violations.iter().map(|v| v.path.as_str()).collect()
    }

    #[test]
    fn test_valid_plan_passes() {
        assert!(registry().validate(ResponseKind::Plan, &valid_plan()).is_ok());
    }

    #[test]
    fn test_plan_violations_are_complete() {
        let mut plan = valid_plan();
        plan["weekOf"] = json!("next monday");
        plan["timeBlocks"]["Mon"][0]["hours"] = json!("two");
        plan["resources"][0]["url"] = json!("not a url");
        plan["mood"] = json!("optimistic");

        let violations = registry()
            .validate(ResponseKind::Plan, &plan)
            .unwrap_err();
        let paths = paths(&violations);

        assert!(paths.contains(&"/weekOf"), "{paths:?}");
        assert!(paths.contains(&"/timeBlocks/Mon/0/hours"), "{paths:?}");
        assert!(paths.contains(&"/resources/0/url"), "{paths:?}");
        assert!(paths.contains(&"/"), "unknown top-level field: {paths:?}");
    }

    #[test]
    fn test_plan_rejects_unknown_weekday_and_non_positive_hours() {
        let mut plan = valid_plan();
        plan["timeBlocks"]["Funday"] = json!([]);
        plan["timeBlocks"]["Mon"][1]["hours"] = json!(0);

        let violations = registry()
            .validate(ResponseKind::Plan, &plan)
            .unwrap_err();
        let paths = paths(&violations);
        assert!(paths.contains(&"/timeBlocks"), "{paths:?}");
        assert!(paths.contains(&"/timeBlocks/Mon/1/hours"), "{paths:?}");
    }

    #[test]
    fn test_plan_rejects_missing_fields() {
        let violations = registry()
            .validate(ResponseKind::Plan, &json!({ "weekOf": "2026-10-19" }))
            .unwrap_err();
        // timeBlocks, dailyTasks, milestones, resources
        assert_eq!(violations.len(), 4);
    }

    #[test]
    fn test_prep_pack_schema() {
        let prep = json!({
            "outline": [{"name": "Behavioral", "items": ["STAR stories"]}],
            "drills": {"Tue": ["Explain a past outage"]},
            "starterQuestions": ["Tell me about yourself"],
            "resources": []
        });
        assert!(registry().validate(ResponseKind::PrepPack, &prep).is_ok());

        let bad = json!({ "outline": [{"name": "Behavioral"}], "drills": {}, "starterQuestions": [], "resources": [] });
        let violations = registry()
            .validate(ResponseKind::PrepPack, &bad)
            .unwrap_err();
        assert_eq!(paths(&violations), vec!["/outline/0"]);
    }

    #[test]
    fn test_section_schema_accepts_only_its_key() {
        let registry = registry();
        let kind = ResponseKind::Reroll(RerollSection::Resources);

        let ok = json!({ "resources": [{"title": "Docs", "url": "http://example.com"}] });
        assert!(registry.validate(kind, &ok).is_ok());

        let extra = json!({ "resources": [], "milestones": [] });
        assert!(registry.validate(kind, &extra).is_err());

        let wrong = json!({ "dailyTasks": {} });
        assert!(registry.validate(kind, &wrong).is_err());
    }

    #[test]
    fn test_time_blocks_section() {
        let kind = ResponseKind::Reroll(RerollSection::TimeBlocks);
        let ok = json!({ "timeBlocks": { "Fri": [{"label": "Drills", "hours": 2}] } });
        assert!(registry().validate(kind, &ok).is_ok());

        let bad = json!({ "timeBlocks": { "Fri": [{"label": "Drills"}] } });
        assert!(registry().validate(kind, &bad).is_err());
    }
}
