mod calculation_result;
mod exchange_rules;
mod timeline_milestone;

pub use calculation_result::CalculationResult;
pub use exchange_rules::{
    DEFAULT_ACQUISITION_THRESHOLD, DEFAULT_AGGREGATE_VALUE_MULTIPLIER,
    DEFAULT_REPLACEMENT_BUFFER_RATE, DEFAULT_THREE_PROPERTY_LIMIT, ExchangeRules,
    ExchangeRulesError, MAX_AGGREGATE_VALUE_MULTIPLIER,
};
pub use timeline_milestone::{MilestoneStatus, TimelineMilestone};
