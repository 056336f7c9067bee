use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A dated checkpoint in an exchange, derived from the closing date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineMilestone {
    pub label: String,
    pub date: NaiveDate,
    pub notes: String,
}

/// Where a milestone falls relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
    Completed,
    Today,
    Upcoming,
}

impl MilestoneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Today => "today",
            Self::Upcoming => "upcoming",
        }
    }
}

impl TimelineMilestone {
    pub fn status_on(
        &self,
        today: NaiveDate,
    ) -> MilestoneStatus {
        match self.date.cmp(&today) {
            std::cmp::Ordering::Less => MilestoneStatus::Completed,
            std::cmp::Ordering::Equal => MilestoneStatus::Today,
            std::cmp::Ordering::Greater => MilestoneStatus::Upcoming,
        }
    }
}
