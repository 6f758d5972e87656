use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Day of the week, spelled the way the wire format spells it (`"Mon"`..`"Sun"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown weekday '{s}'"))
    }
}

/// A single scheduled activity. `hours` is in the same unit as the
/// profile's daily time budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeBlock {
    pub label: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Resource {
    pub title: String,
    pub url: String,
}

pub type DaySchedule = BTreeMap<Weekday, Vec<TimeBlock>>;
pub type DailyTasks = BTreeMap<Weekday, Vec<String>>;

/// A plan exactly as the model is asked to produce it. The server turns it
/// into a [`Plan`] by assigning a version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PlanDraft {
    pub week_of: NaiveDate,
    pub time_blocks: DaySchedule,
    pub daily_tasks: DailyTasks,
    pub milestones: Vec<String>,
    pub resources: Vec<Resource>,
}

/// One generated week. For every weekday present in `time_blocks` the block
/// durations sum to the profile budget once the server pipeline has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub week_of: NaiveDate,
    pub time_blocks: DaySchedule,
    pub daily_tasks: DailyTasks,
    pub milestones: Vec<String>,
    pub resources: Vec<Resource>,
    pub version: u64,
}

impl PlanDraft {
    pub fn into_plan(self, version: u64) -> Plan {
        Plan {
            week_of: self.week_of,
            time_blocks: self.time_blocks,
            daily_tasks: self.daily_tasks,
            milestones: self.milestones,
            resources: self.resources,
            version,
        }
    }
}

impl Plan {
    /// Total scheduled hours for `day`, or `None` when the day has no entry.
    pub fn day_total(&self, day: Weekday) -> Option<f64> {
        self.time_blocks
            .get(&day)
            .map(|blocks| blocks.iter().map(|b| b.hours).sum())
    }
}
