//! Boot calculator.
//!
//! Boot is value taken out of an exchange instead of being reinvested in
//! like-kind property. It has two sources: cash (equity that does not carry
//! into the replacement property) and mortgage relief (debt paid off but not
//! replaced).
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Mortgage boot: max(0, relinquished debt − replacement debt) |
//! | 2    | Relinquished equity: sale price − relinquished debt |
//! | 3    | Replacement equity: replacement price − replacement debt |
//! | 4    | Equity shortfall: max(0, line 2 − line 3) |
//! | 5    | Cash boot: larger of cash received or line 4 |
//! | 6    | Total boot: line 1 + line 5 |
//! | 7    | Estimated tax: line 6 × rate / 100 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use exchange_core::calculations::calculators::BootForm;
//! use exchange_core::{Calculator, ExchangeRules};
//!
//! let form = BootForm {
//!     sale_price: "1000000".into(),
//!     relinquished_debt: "500000".into(),
//!     replacement_price: "900000".into(),
//!     replacement_debt: "450000".into(),
//!     cash_received: "25000".into(),
//!     tax_rate: "20".into(),
//! };
//!
//! let figures = form.calculate(&ExchangeRules::default()).into_result().unwrap();
//!
//! assert_eq!(figures.mortgage_boot, dec!(50000));
//! assert_eq!(figures.cash_boot, dec!(50000));
//! assert_eq!(figures.total_boot, dec!(100000));
//! assert_eq!(figures.estimated_tax, dec!(20000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::calculators::debt_relief::mortgage_boot;
use crate::calculations::common::{apply_rate, non_negative, round_half_up};
use crate::calculations::session::{Calculator, FormFields};
use crate::calculations::validation::{FieldValidator, ValidationError};
use crate::models::{CalculationResult, ExchangeRules};

/// Raw text inputs for the boot calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootForm {
    pub sale_price: String,
    pub relinquished_debt: String,
    pub replacement_price: String,
    pub replacement_debt: String,
    pub cash_received: String,
    pub tax_rate: String,
}

/// Validated boot inputs. All amounts are non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootInput {
    pub sale_price: Decimal,
    pub relinquished_debt: Decimal,
    pub replacement_price: Decimal,
    pub replacement_debt: Decimal,
    pub cash_received: Decimal,
    /// Tax rate on the 0-100 scale.
    pub tax_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootResult {
    pub cash_boot: Decimal,
    pub mortgage_boot: Decimal,
    pub total_boot: Decimal,
    pub estimated_tax: Decimal,

    /// True when no boot arises and the whole gain is deferred.
    pub fully_deferred: bool,
}

impl BootForm {
    /// Parses and range-checks every field, collecting all violations.
    pub fn validate(&self) -> Result<BootInput, Vec<ValidationError>> {
        let mut v = FieldValidator::new();

        let sale_price = v.non_negative("Sale price", &self.sale_price);
        let relinquished_debt = v.non_negative("Relinquished debt", &self.relinquished_debt);
        let replacement_price = v.non_negative("Replacement price", &self.replacement_price);
        let replacement_debt = v.non_negative("Replacement debt", &self.replacement_debt);
        let cash_received = v.non_negative("Cash received", &self.cash_received);
        let tax_rate = v.rate("Tax rate", &self.tax_rate);

        match (
            sale_price,
            relinquished_debt,
            replacement_price,
            replacement_debt,
            cash_received,
            tax_rate,
        ) {
            (
                Some(sale_price),
                Some(relinquished_debt),
                Some(replacement_price),
                Some(replacement_debt),
                Some(cash_received),
                Some(tax_rate),
            ) if v.is_clean() => Ok(BootInput {
                sale_price,
                relinquished_debt,
                replacement_price,
                replacement_debt,
                cash_received,
                tax_rate,
            }),
            _ => Err(v.into_errors()),
        }
    }
}

impl FormFields for BootForm {
    const FIELDS: &'static [&'static str] = &[
        "sale_price",
        "relinquished_debt",
        "replacement_price",
        "replacement_debt",
        "cash_received",
        "tax_rate",
    ];

    fn field_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut String> {
        match name {
            "sale_price" => Some(&mut self.sale_price),
            "relinquished_debt" => Some(&mut self.relinquished_debt),
            "replacement_price" => Some(&mut self.replacement_price),
            "replacement_debt" => Some(&mut self.replacement_debt),
            "cash_received" => Some(&mut self.cash_received),
            "tax_rate" => Some(&mut self.tax_rate),
            _ => None,
        }
    }
}

impl Calculator for BootForm {
    type Figures = BootResult;

    fn calculate(
        &self,
        _rules: &ExchangeRules,
    ) -> CalculationResult<BootResult> {
        self.validate().map(|input| derive_boot(&input)).into()
    }
}

/// Derives cash boot, mortgage boot, their total and the estimated tax.
pub fn derive_boot(input: &BootInput) -> BootResult {
    let mortgage_boot = mortgage_boot(input.relinquished_debt, input.replacement_debt);
    let shortfall = equity_shortfall(input);
    let cash_boot = round_half_up(input.cash_received.max(shortfall));
    let total_boot = round_half_up(cash_boot + mortgage_boot);

    debug!(
        cash_boot = %cash_boot,
        mortgage_boot = %mortgage_boot,
        "boot derived"
    );

    BootResult {
        cash_boot,
        mortgage_boot,
        total_boot,
        estimated_tax: apply_rate(total_boot, input.tax_rate),
        fully_deferred: total_boot.is_zero(),
    }
}

/// Relinquished equity that does not carry into the replacement property.
fn equity_shortfall(input: &BootInput) -> Decimal {
    let relinquished_equity = input.sale_price - input.relinquished_debt;
    let replacement_equity = input.replacement_price - input.replacement_debt;
    round_half_up(non_negative(relinquished_equity - replacement_equity))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn test_input() -> BootInput {
        BootInput {
            sale_price: dec!(1000000),
            relinquished_debt: dec!(500000),
            replacement_price: dec!(1200000),
            replacement_debt: dec!(700000),
            cash_received: dec!(0),
            tax_rate: dec!(20),
        }
    }

    fn test_form() -> BootForm {
        BootForm {
            sale_price: "1,000,000".to_string(),
            relinquished_debt: "500000".to_string(),
            replacement_price: "1200000".to_string(),
            replacement_debt: "700000".to_string(),
            cash_received: "0".to_string(),
            tax_rate: "20".to_string(),
        }
    }

    // =========================================================================
    // equity_shortfall tests
    // =========================================================================

    #[test]
    fn equity_shortfall_is_zero_when_equity_fully_reinvested() {
        assert_eq!(equity_shortfall(&test_input()), Decimal::ZERO);
    }

    #[test]
    fn equity_shortfall_is_unreinvested_equity() {
        let mut input = test_input();
        input.replacement_price = dec!(1100000);

        // 500000 relinquished equity vs 400000 replacement equity
        assert_eq!(equity_shortfall(&input), dec!(100000));
    }

    #[test]
    fn equity_shortfall_never_negative_when_adding_cash() {
        let mut input = test_input();
        input.replacement_debt = dec!(200000);

        assert_eq!(equity_shortfall(&input), Decimal::ZERO);
    }

    // =========================================================================
    // derive_boot tests
    // =========================================================================

    #[test]
    fn derive_boot_full_deferral() {
        let result = derive_boot(&test_input());

        assert_eq!(result.total_boot, Decimal::ZERO);
        assert_eq!(result.estimated_tax, Decimal::ZERO);
        assert!(result.fully_deferred);
    }

    #[test]
    fn derive_boot_cash_received_is_boot() {
        let mut input = test_input();
        input.cash_received = dec!(30000);

        let result = derive_boot(&input);

        assert_eq!(result.cash_boot, dec!(30000));
        assert_eq!(result.total_boot, dec!(30000));
        assert_eq!(result.estimated_tax, dec!(6000));
        assert!(!result.fully_deferred);
    }

    #[test]
    fn derive_boot_cash_is_not_double_counted_with_shortfall() {
        let mut input = test_input();
        input.replacement_price = dec!(1150000);
        input.cash_received = dec!(50000);

        let result = derive_boot(&input);

        // Shortfall of 50000 is the same cash that was received.
        assert_eq!(result.cash_boot, dec!(50000));
    }

    #[test]
    fn derive_boot_sums_cash_and_mortgage_boot() {
        let mut input = test_input();
        input.replacement_price = dec!(900000);
        input.replacement_debt = dec!(450000);
        input.cash_received = dec!(25000);
        input.tax_rate = dec!(25);

        let result = derive_boot(&input);

        assert_eq!(result.mortgage_boot, dec!(50000));
        assert_eq!(result.cash_boot, dec!(50000));
        assert_eq!(result.total_boot, dec!(100000));
        assert_eq!(result.estimated_tax, dec!(25000));
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_accepts_formatted_amounts() {
        let result = test_form().calculate(&ExchangeRules::default());

        assert!(result.is_valid());
    }

    #[test]
    fn calculate_accumulates_all_errors() {
        let form = BootForm {
            sale_price: "-1".to_string(),
            relinquished_debt: "".to_string(),
            replacement_price: "x".to_string(),
            replacement_debt: "-2".to_string(),
            cash_received: "".to_string(),
            tax_rate: "101".to_string(),
        };

        let result = form.calculate(&ExchangeRules::default());

        assert!(result.figures().is_none());
        assert_eq!(
            result.error_messages(),
            vec![
                "Sale price cannot be negative".to_string(),
                "Relinquished debt is required".to_string(),
                "Replacement price must be a valid number".to_string(),
                "Replacement debt cannot be negative".to_string(),
                "Cash received is required".to_string(),
                "Tax rate must be between 0 and 100".to_string(),
            ]
        );
    }

    #[test]
    fn calculate_is_idempotent() {
        let form = test_form();
        let rules = ExchangeRules::default();

        assert_eq!(form.calculate(&rules), form.calculate(&rules));
    }

    #[test]
    fn calculate_handles_extreme_inputs() {
        let max = "1000000000000";
        let tiny = "0.0000000000000000000000000001";
        let fine = "999999999999.9999999999999999";
        let cases = [
            [max, max, max, max, max, "100"],
            [max, "0", tiny, "0", max, "100"],
            [tiny, tiny, tiny, tiny, tiny, tiny],
            [fine, fine, fine, fine, fine, "99.9999999999999999999999999"],
            ["0", max, "0", "0", "1000000000000.01", "100"],
        ];

        for [sale, debt, replacement, replacement_debt, cash, rate] in cases {
            let form = BootForm {
                sale_price: sale.to_string(),
                relinquished_debt: debt.to_string(),
                replacement_price: replacement.to_string(),
                replacement_debt: replacement_debt.to_string(),
                cash_received: cash.to_string(),
                tax_rate: rate.to_string(),
            };

            let result = form.calculate(&ExchangeRules::default());

            assert!(result.is_valid() || !result.errors().is_empty());
        }
    }
}
