use serde::{Deserialize, Serialize};

use crate::plan::Plan;
use crate::prep::PrepPack;

/// `200` body of `POST /generate/routine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineResponse {
    pub plan: Plan,
}

/// `200` body of `POST /generate/prep`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepResponse {
    pub prep: PrepPack,
}

/// `200` body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}
