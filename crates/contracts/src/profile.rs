use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::envelope::Violation;
use crate::plan::{Plan, Weekday};

/// Upper bound on a daily budget; anything above a full day is a typo.
const MAX_DAILY_HOURS: f64 = 24.0;

/// Snapshot of the user the content is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub stage: String,
    pub target_role: String,
    pub time_budget_hours_per_day: f64,
    pub available_days: Vec<Weekday>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
}

impl Profile {
    /// Returns every rule this profile breaks. Empty means valid.
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if self.name.trim().is_empty() {
            violations.push(Violation::new("/profile/name", "must not be empty"));
        }
        if self.target_role.trim().is_empty() {
            violations.push(Violation::new("/profile/targetRole", "must not be empty"));
        }

        let budget = self.time_budget_hours_per_day;
        if !budget.is_finite() || budget <= 0.0 {
            violations.push(Violation::new(
                "/profile/timeBudgetHoursPerDay",
                "must be a positive number",
            ));
        } else if budget > MAX_DAILY_HOURS {
            violations.push(Violation::new(
                "/profile/timeBudgetHoursPerDay",
                format!("must not exceed {MAX_DAILY_HOURS} hours"),
            ));
        }

        if self.available_days.is_empty() {
            violations.push(Violation::new(
                "/profile/availableDays",
                "must contain at least one day",
            ));
        }
        let mut seen = HashSet::new();
        for (i, day) in self.available_days.iter().enumerate() {
            if !seen.insert(*day) {
                violations.push(Violation::new(
                    format!("/profile/availableDays/{i}"),
                    format!("duplicate day '{day}'"),
                ));
            }
        }

        violations
    }
}

/// Body of `POST /generate/routine` and `POST /generate/prep`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub profile: Profile,
}

/// Body of `POST /reroll/{section}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerollRequest {
    pub profile: Profile,
    pub plan: Plan,
}
