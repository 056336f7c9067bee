use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Buffer added on top of the minimum replacement value for the
/// "recommended" figure.
pub const DEFAULT_REPLACEMENT_BUFFER_RATE: Decimal = dec!(0.05);

/// Number of properties that may always be identified regardless of value.
pub const DEFAULT_THREE_PROPERTY_LIMIT: u32 = 3;

/// Aggregate identified value allowed, as a multiple of the relinquished value.
pub const DEFAULT_AGGREGATE_VALUE_MULTIPLIER: Decimal = dec!(2.00);

/// Largest aggregate value multiplier a configuration may set.
pub const MAX_AGGREGATE_VALUE_MULTIPLIER: Decimal = dec!(100);

/// Share of identified value that must be acquired under the 95% rule.
pub const DEFAULT_ACQUISITION_THRESHOLD: Decimal = dec!(0.95);

/// Errors for exchange rule constants outside their meaningful range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExchangeRulesError {
    #[error("replacement buffer rate must be between 0 and 1, got {0}")]
    InvalidReplacementBuffer(Decimal),

    #[error("three-property limit must be at least 1, got {0}")]
    InvalidPropertyLimit(u32),

    #[error("aggregate value multiplier must be greater than 0 and at most 100, got {0}")]
    InvalidAggregateMultiplier(Decimal),

    #[error("acquisition threshold must be greater than 0 and at most 1, got {0}")]
    InvalidAcquisitionThreshold(Decimal),
}

/// Named constants the calculators apply.
///
/// The identification constants mirror the IRS identification tests; the
/// replacement buffer is a presentation choice with no statutory source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeRules {
    /// Fraction added to the minimum replacement value (0.05 = 5%).
    pub replacement_buffer_rate: Decimal,

    /// Maximum property count under the three-property rule.
    pub three_property_limit: u32,

    /// Multiple of the relinquished value allowed under the 200% rule.
    pub aggregate_value_multiplier: Decimal,

    /// Fraction of identified value that must be acquired under the 95% rule.
    pub acquisition_threshold: Decimal,
}

impl Default for ExchangeRules {
    fn default() -> Self {
        Self {
            replacement_buffer_rate: DEFAULT_REPLACEMENT_BUFFER_RATE,
            three_property_limit: DEFAULT_THREE_PROPERTY_LIMIT,
            aggregate_value_multiplier: DEFAULT_AGGREGATE_VALUE_MULTIPLIER,
            acquisition_threshold: DEFAULT_ACQUISITION_THRESHOLD,
        }
    }
}

impl ExchangeRules {
    /// Checks every constant against its valid range.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExchangeRulesError`] found, checked in field order.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use exchange_core::{ExchangeRules, ExchangeRulesError};
    ///
    /// let rules = ExchangeRules {
    ///     replacement_buffer_rate: dec!(-0.05),
    ///     ..ExchangeRules::default()
    /// };
    ///
    /// assert_eq!(
    ///     rules.validate(),
    ///     Err(ExchangeRulesError::InvalidReplacementBuffer(dec!(-0.05)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), ExchangeRulesError> {
        if self.replacement_buffer_rate < Decimal::ZERO || self.replacement_buffer_rate > Decimal::ONE
        {
            return Err(ExchangeRulesError::InvalidReplacementBuffer(
                self.replacement_buffer_rate,
            ));
        }
        if self.three_property_limit == 0 {
            return Err(ExchangeRulesError::InvalidPropertyLimit(
                self.three_property_limit,
            ));
        }
        if self.aggregate_value_multiplier <= Decimal::ZERO
            || self.aggregate_value_multiplier > MAX_AGGREGATE_VALUE_MULTIPLIER
        {
            return Err(ExchangeRulesError::InvalidAggregateMultiplier(
                self.aggregate_value_multiplier,
            ));
        }
        if self.acquisition_threshold <= Decimal::ZERO || self.acquisition_threshold > Decimal::ONE {
            return Err(ExchangeRulesError::InvalidAcquisitionThreshold(
                self.acquisition_threshold,
            ));
        }
        Ok(())
    }
}
