use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::plan::{DailyTasks, DaySchedule, Resource};

/// The plan sections that can be regenerated on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RerollSection {
    TimeBlocks,
    Resources,
    DailyTasks,
}

impl RerollSection {
    pub const ALL: [RerollSection; 3] = [
        RerollSection::TimeBlocks,
        RerollSection::Resources,
        RerollSection::DailyTasks,
    ];

    /// Path segment and response key for this section.
    pub fn as_str(&self) -> &'static str {
        match self {
            RerollSection::TimeBlocks => "timeBlocks",
            RerollSection::Resources => "resources",
            RerollSection::DailyTasks => "dailyTasks",
        }
    }
}

impl fmt::Display for RerollSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RerollSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RerollSection::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| format!("unknown reroll section '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TimeBlocksSection {
    pub time_blocks: DaySchedule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourcesSection {
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DailyTasksSection {
    pub daily_tasks: DailyTasks,
}
