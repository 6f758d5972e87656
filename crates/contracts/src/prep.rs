use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::plan::{Resource, Weekday};

/// One named section of the interview-prep outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutlineSection {
    pub name: String,
    pub items: Vec<String>,
}

/// Interview-preparation content. Structural contract only; there is no
/// numeric invariant to enforce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrepPack {
    pub outline: Vec<OutlineSection>,
    pub drills: BTreeMap<Weekday, Vec<String>>,
    pub starter_questions: Vec<String>,
    pub resources: Vec<Resource>,
}
