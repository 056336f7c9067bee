//! Debt relief (mortgage boot) calculator.
//!
//! When the debt on the replacement property is lower than the debt paid off
//! on the relinquished property, the difference is treated as boot. An
//! increase in debt never produces a credit.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Mortgage boot: max(0, old mortgage − new mortgage) |
//! | 2    | Estimated tax: mortgage boot × rate / 100 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use exchange_core::calculations::calculators::{DebtReliefForm, DebtReliefOutcome};
//! use exchange_core::{Calculator, ExchangeRules};
//!
//! let form = DebtReliefForm {
//!     old_mortgage: "500000".into(),
//!     new_mortgage: "400000".into(),
//!     tax_rate: "20".into(),
//! };
//!
//! let result = form.calculate(&ExchangeRules::default());
//! let figures = result.figures().unwrap();
//!
//! assert_eq!(figures.mortgage_boot, dec!(100000));
//! assert_eq!(figures.estimated_tax, dec!(20000));
//! assert_eq!(figures.outcome, DebtReliefOutcome::BootRecognized);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{apply_rate, non_negative, round_half_up};
use crate::calculations::session::{Calculator, FormFields};
use crate::calculations::validation::{FieldValidator, ValidationError};
use crate::models::{CalculationResult, ExchangeRules};

/// Raw text inputs for the debt relief calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtReliefForm {
    pub old_mortgage: String,
    pub new_mortgage: String,
    pub tax_rate: String,
}

/// Validated debt relief inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtReliefInput {
    /// Mortgage balance paid off on the relinquished property.
    pub old_mortgage: Decimal,

    /// Mortgage taken on the replacement property.
    pub new_mortgage: Decimal,

    /// Tax rate on the 0-100 scale.
    pub tax_rate: Decimal,
}

/// Whether the debt change creates boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtReliefOutcome {
    /// Debt decreased; the decrease is taxable boot.
    BootRecognized,
    /// Debt stayed the same or increased; nothing is owed on debt relief.
    NoBoot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtReliefResult {
    pub mortgage_boot: Decimal,
    pub estimated_tax: Decimal,

    /// New mortgage minus old mortgage. Negative when debt was reduced.
    pub debt_change: Decimal,

    pub outcome: DebtReliefOutcome,
}

impl DebtReliefForm {
    /// Parses and range-checks every field, collecting all violations.
    pub fn validate(&self) -> Result<DebtReliefInput, Vec<ValidationError>> {
        let mut v = FieldValidator::new();

        let old_mortgage = v.non_negative("Old mortgage balance", &self.old_mortgage);
        let new_mortgage = v.non_negative("New mortgage balance", &self.new_mortgage);
        let tax_rate = v.rate("Tax rate", &self.tax_rate);

        match (old_mortgage, new_mortgage, tax_rate) {
            (Some(old_mortgage), Some(new_mortgage), Some(tax_rate)) if v.is_clean() => {
                Ok(DebtReliefInput {
                    old_mortgage,
                    new_mortgage,
                    tax_rate,
                })
            }
            _ => Err(v.into_errors()),
        }
    }
}

impl FormFields for DebtReliefForm {
    const FIELDS: &'static [&'static str] = &["old_mortgage", "new_mortgage", "tax_rate"];

    fn field_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut String> {
        match name {
            "old_mortgage" => Some(&mut self.old_mortgage),
            "new_mortgage" => Some(&mut self.new_mortgage),
            "tax_rate" => Some(&mut self.tax_rate),
            _ => None,
        }
    }
}

impl Calculator for DebtReliefForm {
    type Figures = DebtReliefResult;

    fn calculate(
        &self,
        _rules: &ExchangeRules,
    ) -> CalculationResult<DebtReliefResult> {
        self.validate().map(|input| derive_debt_relief(&input)).into()
    }
}

/// Derives mortgage boot and its estimated tax.
pub fn derive_debt_relief(input: &DebtReliefInput) -> DebtReliefResult {
    let debt_change = round_half_up(input.new_mortgage - input.old_mortgage);
    let mortgage_boot = mortgage_boot(input.old_mortgage, input.new_mortgage);

    let outcome = if mortgage_boot > Decimal::ZERO {
        DebtReliefOutcome::BootRecognized
    } else {
        DebtReliefOutcome::NoBoot
    };

    DebtReliefResult {
        mortgage_boot,
        estimated_tax: apply_rate(mortgage_boot, input.tax_rate),
        debt_change,
        outcome,
    }
}

/// Debt relieved but not replaced, never below zero.
pub(crate) fn mortgage_boot(
    old_mortgage: Decimal,
    new_mortgage: Decimal,
) -> Decimal {
    let relief = old_mortgage - new_mortgage;
    if relief < Decimal::ZERO {
        warn!(
            old_mortgage = %old_mortgage,
            new_mortgage = %new_mortgage,
            "replacement debt exceeds relinquished debt; no mortgage boot"
        );
    }
    round_half_up(non_negative(relief))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn form(
        old: &str,
        new: &str,
        rate: &str,
    ) -> DebtReliefForm {
        DebtReliefForm {
            old_mortgage: old.to_string(),
            new_mortgage: new.to_string(),
            tax_rate: rate.to_string(),
        }
    }

    // =========================================================================
    // mortgage_boot tests
    // =========================================================================

    #[test]
    fn mortgage_boot_is_debt_decrease() {
        assert_eq!(mortgage_boot(dec!(500000), dec!(400000)), dec!(100000));
    }

    #[test]
    fn mortgage_boot_is_zero_when_debt_unchanged() {
        assert_eq!(mortgage_boot(dec!(400000), dec!(400000)), Decimal::ZERO);
    }

    #[test]
    fn mortgage_boot_never_negative() {
        let samples = [
            (dec!(0), dec!(0)),
            (dec!(0), dec!(1)),
            (dec!(1), dec!(0)),
            (dec!(400000), dec!(500000)),
            (dec!(123456.78), dec!(123456.77)),
            (dec!(1000000000000), dec!(0)),
        ];

        for (old, new) in samples {
            let boot = mortgage_boot(old, new);
            assert!(boot >= Decimal::ZERO);
            assert_eq!(boot, non_negative(old - new));
        }
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_reports_every_violation() {
        let errors = form("-1", "", "150").validate().unwrap_err();

        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Old mortgage balance cannot be negative".to_string(),
                "New mortgage balance is required".to_string(),
                "Tax rate must be between 0 and 100".to_string(),
            ]
        );
    }

    #[test]
    fn validate_accepts_zero_balances() {
        let input = form("0", "0", "0").validate().unwrap();

        assert_eq!(input.old_mortgage, Decimal::ZERO);
        assert_eq!(input.new_mortgage, Decimal::ZERO);
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_debt_decrease_scenario() {
        let result = form("500000", "400000", "20").calculate(&ExchangeRules::default());

        let figures = result.figures().unwrap();
        assert_eq!(figures.mortgage_boot, dec!(100000));
        assert_eq!(figures.estimated_tax, dec!(20000));
        assert_eq!(figures.debt_change, dec!(-100000));
        assert_eq!(figures.outcome, DebtReliefOutcome::BootRecognized);
    }

    #[test]
    fn calculate_debt_increase_is_no_boot_success() {
        let result = form("400000", "500000", "20").calculate(&ExchangeRules::default());

        assert!(result.is_valid());
        let figures = result.figures().unwrap();
        assert_eq!(figures.mortgage_boot, Decimal::ZERO);
        assert_eq!(figures.estimated_tax, Decimal::ZERO);
        assert_eq!(figures.outcome, DebtReliefOutcome::NoBoot);
    }

    #[test]
    fn calculate_equal_debt_is_no_boot() {
        let result = form("250000", "250000", "37").calculate(&ExchangeRules::default());

        assert_eq!(result.figures().unwrap().outcome, DebtReliefOutcome::NoBoot);
    }

    #[test]
    fn calculate_invalid_input_has_no_figures() {
        let result = form("abc", "400000", "20").calculate(&ExchangeRules::default());

        assert!(!result.is_valid());
        assert!(result.figures().is_none());
        assert_eq!(
            result.error_messages(),
            vec!["Old mortgage balance must be a valid number".to_string()]
        );
    }

    #[test]
    fn calculate_is_idempotent() {
        let form = form("612345.67", "498000.01", "23.8");
        let rules = ExchangeRules::default();

        assert_eq!(form.calculate(&rules), form.calculate(&rules));
    }

    #[test]
    fn calculate_handles_extreme_inputs() {
        let max = "1000000000000";
        let tiny = "0.0000000000000000000000000001";
        let fine = "999999999999.9999999999999999";
        let cases = [
            [max, "0", "100"],
            ["0", max, "100"],
            [max, tiny, "99.9999999999999999999999999"],
            [fine, tiny, tiny],
            ["1000000000000.01", max, "100"],
        ];

        for [old_mortgage, new_mortgage, tax_rate] in cases {
            let form = DebtReliefForm {
                old_mortgage: old_mortgage.to_string(),
                new_mortgage: new_mortgage.to_string(),
                tax_rate: tax_rate.to_string(),
            };

            let result = form.calculate(&ExchangeRules::default());

            assert!(result.is_valid() || !result.errors().is_empty());
        }
    }
}
