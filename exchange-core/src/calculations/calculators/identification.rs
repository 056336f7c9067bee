//! Identification rules checker.
//!
//! Replacement properties identified within the 45-day window must satisfy
//! at least one of three alternative tests:
//!
//! | Test | Passes when |
//! |------|-------------|
//! | Three-property | No more than 3 properties are identified, whatever their value |
//! | 200% | Aggregate identified value ≤ 200% of the relinquished value |
//! | 95% | Properties to be acquired are worth ≥ 95% of the aggregate identified value |
//!
//! Every test is reported on its own so the user can see which path they
//! qualify under. The limits come from [`ExchangeRules`].
//!
//! # Example
//!
//! ```
//! use exchange_core::calculations::calculators::{
//!     IdentificationForm, IdentificationRule, IdentifiedPropertyForm,
//! };
//! use exchange_core::{Calculator, ExchangeRules};
//!
//! let form = IdentificationForm {
//!     relinquished_value: "1000000".into(),
//!     properties: vec![
//!         IdentifiedPropertyForm::new("12 Oak St", "900000", true),
//!         IdentifiedPropertyForm::new("40 Elm Ave", "950000", false),
//!     ],
//! };
//!
//! let report = form.calculate(&ExchangeRules::default()).into_result().unwrap();
//!
//! assert!(report.compliant);
//! assert_eq!(
//!     report.satisfied_rules(),
//!     vec![IdentificationRule::ThreeProperty, IdentificationRule::TwoHundredPercent]
//! );
//! ```

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::calculations::session::Calculator;
use crate::calculations::validation::{FieldValidator, ValidationError};
use crate::models::{CalculationResult, ExchangeRules};

/// One identified replacement property as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedPropertyForm {
    pub address: String,
    pub value: String,
    /// Whether the taxpayer intends to close on this property.
    #[serde(default)]
    pub intend_to_acquire: bool,
}

impl IdentifiedPropertyForm {
    pub fn new(
        address: impl Into<String>,
        value: impl Into<String>,
        intend_to_acquire: bool,
    ) -> Self {
        Self {
            address: address.into(),
            value: value.into(),
            intend_to_acquire,
        }
    }
}

/// Raw inputs for the identification checker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationForm {
    pub relinquished_value: String,
    pub properties: Vec<IdentifiedPropertyForm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifiedProperty {
    pub address: String,
    pub value: Decimal,
    pub intend_to_acquire: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationInput {
    pub relinquished_value: Decimal,
    /// Never empty.
    pub properties: Vec<IdentifiedProperty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentificationRule {
    ThreeProperty,
    TwoHundredPercent,
    NinetyFivePercent,
}

impl fmt::Display for IdentificationRule {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            Self::ThreeProperty => "3-property rule",
            Self::TwoHundredPercent => "200% rule",
            Self::NinetyFivePercent => "95% rule",
        };
        f.write_str(name)
    }
}

/// The outcome of a single identification test with the figures it compared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCheck {
    pub rule: IdentificationRule,
    pub passed: bool,
    /// The measured quantity (property count or dollar value).
    pub actual: Decimal,
    /// The limit or threshold it was compared against.
    pub limit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentificationReport {
    pub property_count: usize,
    pub total_identified_value: Decimal,
    pub total_acquired_value: Decimal,

    /// One entry per test, in the order three-property, 200%, 95%.
    pub checks: Vec<RuleCheck>,

    /// True when at least one test passed.
    pub compliant: bool,
}

impl IdentificationReport {
    pub fn check(
        &self,
        rule: IdentificationRule,
    ) -> Option<&RuleCheck> {
        self.checks.iter().find(|c| c.rule == rule)
    }

    pub fn satisfied_rules(&self) -> Vec<IdentificationRule> {
        self.checks
            .iter()
            .filter(|c| c.passed)
            .map(|c| c.rule)
            .collect()
    }
}

impl IdentificationForm {
    /// Validates the relinquished value and every property row.
    ///
    /// Property errors are labelled by their 1-based position.
    pub fn validate(&self) -> Result<IdentificationInput, Vec<ValidationError>> {
        let mut v = FieldValidator::new();

        let relinquished_value = v.positive("Relinquished property value", &self.relinquished_value);

        if self.properties.is_empty() {
            v.push(ValidationError::NoIdentifiedProperties);
        }

        let properties: Vec<Option<IdentifiedProperty>> = self
            .properties
            .iter()
            .enumerate()
            .map(|(idx, property)| {
                let position = idx + 1;
                let address = v.text(&format!("Property {position} address"), &property.address);
                let value = v.positive(&format!("Property {position} value"), &property.value);
                Some(IdentifiedProperty {
                    address: address?,
                    value: value?,
                    intend_to_acquire: property.intend_to_acquire,
                })
            })
            .collect();

        match (relinquished_value, properties.into_iter().collect::<Option<Vec<_>>>()) {
            (Some(relinquished_value), Some(properties)) if v.is_clean() => {
                Ok(IdentificationInput {
                    relinquished_value,
                    properties,
                })
            }
            _ => Err(v.into_errors()),
        }
    }
}

impl Calculator for IdentificationForm {
    type Figures = IdentificationReport;

    fn calculate(
        &self,
        rules: &ExchangeRules,
    ) -> CalculationResult<IdentificationReport> {
        let checker = IdentificationRulesChecker::new(rules);
        self.validate().map(|input| checker.check(&input)).into()
    }
}

/// Applies the three identification tests with configurable limits.
#[derive(Debug, Clone)]
pub struct IdentificationRulesChecker {
    property_limit: u32,
    aggregate_multiplier: Decimal,
    acquisition_threshold: Decimal,
}

impl IdentificationRulesChecker {
    pub fn new(rules: &ExchangeRules) -> Self {
        Self {
            property_limit: rules.three_property_limit,
            aggregate_multiplier: rules.aggregate_value_multiplier,
            acquisition_threshold: rules.acquisition_threshold,
        }
    }

    pub fn check(
        &self,
        input: &IdentificationInput,
    ) -> IdentificationReport {
        let property_count = input.properties.len();
        let total_identified_value =
            round_half_up(input.properties.iter().map(|p| p.value).sum());
        let total_acquired_value = round_half_up(
            input
                .properties
                .iter()
                .filter(|p| p.intend_to_acquire)
                .map(|p| p.value)
                .sum(),
        );

        let checks = vec![
            self.three_property_check(property_count),
            self.two_hundred_percent_check(total_identified_value, input.relinquished_value),
            self.ninety_five_percent_check(total_acquired_value, total_identified_value),
        ];
        let compliant = checks.iter().any(|c| c.passed);

        debug!(
            property_count,
            total_identified_value = %total_identified_value,
            compliant,
            "identification checked"
        );

        IdentificationReport {
            property_count,
            total_identified_value,
            total_acquired_value,
            checks,
            compliant,
        }
    }

    fn three_property_check(
        &self,
        property_count: usize,
    ) -> RuleCheck {
        let actual = Decimal::from(property_count);
        let limit = Decimal::from(self.property_limit);
        RuleCheck {
            rule: IdentificationRule::ThreeProperty,
            passed: actual <= limit,
            actual,
            limit,
        }
    }

    fn two_hundred_percent_check(
        &self,
        total_identified_value: Decimal,
        relinquished_value: Decimal,
    ) -> RuleCheck {
        let limit = round_half_up(relinquished_value.saturating_mul(self.aggregate_multiplier));
        RuleCheck {
            rule: IdentificationRule::TwoHundredPercent,
            passed: total_identified_value <= limit,
            actual: total_identified_value,
            limit,
        }
    }

    fn ninety_five_percent_check(
        &self,
        total_acquired_value: Decimal,
        total_identified_value: Decimal,
    ) -> RuleCheck {
        // Unrounded: any shortfall, even below one cent, fails.
        let threshold = total_identified_value.saturating_mul(self.acquisition_threshold);
        RuleCheck {
            rule: IdentificationRule::NinetyFivePercent,
            passed: total_acquired_value >= threshold,
            actual: total_acquired_value,
            limit: threshold,
        }
    }
}
