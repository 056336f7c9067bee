//! Exchange deadline and milestone timeline.
//!
//! Every date is a fixed number of calendar days after the relinquished
//! property's closing date. Business days and time zones play no part.
//!
//! | Day | Milestone |
//! |-----|-----------|
//! | 0   | Relinquished property closes |
//! | 15  | Shortlist replacement candidates |
//! | 45  | Identification deadline |
//! | 120 | Target replacement closing |
//! | 180 | Exchange deadline |
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use exchange_core::calculations::timeline::{ExchangePhase, TimelineForm};
//! use exchange_core::{Calculator, ExchangeRules};
//!
//! let form = TimelineForm { closing_date: "2025-01-01".into() };
//! let timeline = form.calculate(&ExchangeRules::default()).into_result().unwrap();
//!
//! assert_eq!(timeline.identification_deadline, NaiveDate::from_ymd_opt(2025, 2, 15).unwrap());
//! assert_eq!(timeline.replacement_deadline, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
//!
//! let today = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
//! assert_eq!(timeline.phase(today), ExchangePhase::IdentificationPeriod);
//! assert_eq!(timeline.days_until_identification(today), 14);
//! ```

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::session::{Calculator, FormFields};
use crate::calculations::validation::{FieldValidator, ValidationError};
use crate::models::{CalculationResult, ExchangeRules, MilestoneStatus, TimelineMilestone};

pub const IDENTIFICATION_PERIOD_DAYS: u64 = 45;
pub const EXCHANGE_PERIOD_DAYS: u64 = 180;

/// `(day offset, label, notes)` in chronological order.
const MILESTONES: [(u64, &str, &str); 5] = [
    (
        0,
        "Relinquished property closes",
        "Sale proceeds go directly to the qualified intermediary.",
    ),
    (
        15,
        "Shortlist replacement candidates",
        "Narrow the search while there is time to inspect and negotiate.",
    ),
    (
        IDENTIFICATION_PERIOD_DAYS,
        "Identification deadline",
        "Replacement properties must be identified in writing by midnight.",
    ),
    (
        120,
        "Target replacement closing",
        "Leaves a margin for financing or title delays.",
    ),
    (
        EXCHANGE_PERIOD_DAYS,
        "Exchange deadline",
        "Replacement property must be received by this date.",
    ),
];

const CLOSING_DATE_LABEL: &str = "Closing date";

/// Raw input for the timeline: a `YYYY-MM-DD` closing date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineForm {
    pub closing_date: String,
}

/// Where an exchange stands on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangePhase {
    NotStarted,
    IdentificationPeriod,
    ExchangePeriod,
    Expired,
}

impl ExchangePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::IdentificationPeriod => "identification period",
            Self::ExchangePeriod => "exchange period",
            Self::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeTimeline {
    pub closing_date: NaiveDate,
    pub identification_deadline: NaiveDate,
    pub replacement_deadline: NaiveDate,
    /// Always five entries, oldest first.
    pub milestones: Vec<TimelineMilestone>,
}

impl ExchangeTimeline {
    /// Negative once the deadline has passed.
    pub fn days_until_identification(
        &self,
        today: NaiveDate,
    ) -> i64 {
        self.identification_deadline
            .signed_duration_since(today)
            .num_days()
    }

    /// Negative once the deadline has passed.
    pub fn days_until_replacement(
        &self,
        today: NaiveDate,
    ) -> i64 {
        self.replacement_deadline
            .signed_duration_since(today)
            .num_days()
    }

    /// Both deadlines are inclusive: the deadline day itself is still in
    /// its period.
    pub fn phase(
        &self,
        today: NaiveDate,
    ) -> ExchangePhase {
        if today < self.closing_date {
            ExchangePhase::NotStarted
        } else if today <= self.identification_deadline {
            ExchangePhase::IdentificationPeriod
        } else if today <= self.replacement_deadline {
            ExchangePhase::ExchangePeriod
        } else {
            ExchangePhase::Expired
        }
    }

    pub fn milestone_statuses(
        &self,
        today: NaiveDate,
    ) -> Vec<(&TimelineMilestone, MilestoneStatus)> {
        self.milestones
            .iter()
            .map(|m| (m, m.status_on(today)))
            .collect()
    }
}

impl TimelineForm {
    pub fn validate(&self) -> Result<NaiveDate, Vec<ValidationError>> {
        let mut v = FieldValidator::new();
        match v.date(CLOSING_DATE_LABEL, &self.closing_date) {
            Some(closing_date) if v.is_clean() => Ok(closing_date),
            _ => Err(v.into_errors()),
        }
    }
}

impl FormFields for TimelineForm {
    const FIELDS: &'static [&'static str] = &["closing_date"];

    fn field_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut String> {
        match name {
            "closing_date" => Some(&mut self.closing_date),
            _ => None,
        }
    }

    /// Dates keep their dashes; only surrounding whitespace is dropped.
    fn sanitize(
        _field: &str,
        raw: &str,
    ) -> String {
        raw.trim().to_string()
    }
}

impl Calculator for TimelineForm {
    type Figures = ExchangeTimeline;

    fn calculate(
        &self,
        _rules: &ExchangeRules,
    ) -> CalculationResult<ExchangeTimeline> {
        self.validate()
            .and_then(|closing_date| {
                derive_timeline(closing_date).ok_or_else(|| {
                    vec![ValidationError::InvalidDate {
                        field: CLOSING_DATE_LABEL.to_string(),
                        input: self.closing_date.clone(),
                    }]
                })
            })
            .into()
    }
}

/// Derives both deadlines and the milestone list from `closing_date`.
///
/// Returns `None` only when a derived date falls past the end of the
/// supported calendar.
pub fn derive_timeline(closing_date: NaiveDate) -> Option<ExchangeTimeline> {
    let milestones = MILESTONES
        .iter()
        .map(|&(offset, label, notes)| {
            Some(TimelineMilestone {
                label: label.to_string(),
                date: closing_date.checked_add_days(Days::new(offset))?,
                notes: notes.to_string(),
            })
        })
        .collect::<Option<Vec<_>>>()?;

    let identification_deadline =
        closing_date.checked_add_days(Days::new(IDENTIFICATION_PERIOD_DAYS))?;
    let replacement_deadline = closing_date.checked_add_days(Days::new(EXCHANGE_PERIOD_DAYS))?;

    debug!(
        closing = %closing_date,
        identification = %identification_deadline,
        replacement = %replacement_deadline,
        "timeline derived"
    );

    Some(ExchangeTimeline {
        closing_date,
        identification_deadline,
        replacement_deadline,
        milestones,
    })
}
