//! Depreciation recapture estimator.
//!
//! The part of a gain that comes from depreciation already claimed is taxed
//! at its own rate. The recapture base is bounded independently by the
//! depreciation taken and by the gain actually realized, so a sale at a loss
//! recaptures nothing.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Adjusted basis: cost basis − accumulated depreciation |
//! | 2    | Total gain: sale price − line 1 (negative for a loss) |
//! | 3    | Recapture base: min(depreciation, max(0, line 2)) |
//! | 4    | Recapture tax: line 3 × rate / 100 |
//! | 5    | Net after recapture: sale price − line 4 |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use exchange_core::calculations::calculators::DepreciationRecaptureForm;
//! use exchange_core::{Calculator, ExchangeRules};
//!
//! let form = DepreciationRecaptureForm {
//!     cost_basis: "500000".into(),
//!     accumulated_depreciation: "100000".into(),
//!     sale_price: "750000".into(),
//!     recapture_rate: "25".into(),
//! };
//!
//! let figures = form.calculate(&ExchangeRules::default()).into_result().unwrap();
//!
//! assert_eq!(figures.adjusted_basis, dec!(400000));
//! assert_eq!(figures.total_gain, dec!(350000));
//! assert_eq!(figures.recapture_base, dec!(100000));
//! assert_eq!(figures.recapture_tax, dec!(25000));
//! assert_eq!(figures.net_after_recapture, dec!(725000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::{apply_rate, non_negative, round_half_up};
use crate::calculations::session::{Calculator, FormFields};
use crate::calculations::validation::{FieldValidator, ValidationError};
use crate::models::{CalculationResult, ExchangeRules};

/// Raw text inputs for the recapture estimator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationRecaptureForm {
    pub cost_basis: String,
    pub accumulated_depreciation: String,
    pub sale_price: String,
    pub recapture_rate: String,
}

/// Validated recapture inputs.
///
/// `cost_basis` and `sale_price` are positive; `accumulated_depreciation` is
/// between zero and `cost_basis` inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationRecaptureInput {
    pub cost_basis: Decimal,
    pub accumulated_depreciation: Decimal,
    pub sale_price: Decimal,
    /// Recapture rate on the 0-100 scale.
    pub recapture_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationRecaptureResult {
    pub adjusted_basis: Decimal,

    /// Sale price minus adjusted basis. Negative when the property sold at a loss.
    pub total_gain: Decimal,

    pub recapture_base: Decimal,
    pub recapture_tax: Decimal,
    pub net_after_recapture: Decimal,

    /// Gain beyond the recaptured depreciation, taxed as capital gain.
    pub capital_gain_portion: Decimal,
}

impl DepreciationRecaptureForm {
    /// Parses and range-checks every field, then checks depreciation against basis.
    pub fn validate(&self) -> Result<DepreciationRecaptureInput, Vec<ValidationError>> {
        let mut v = FieldValidator::new();

        let cost_basis = v.positive("Original cost basis", &self.cost_basis);
        let accumulated_depreciation =
            v.non_negative("Accumulated depreciation", &self.accumulated_depreciation);
        let sale_price = v.positive("Sale price", &self.sale_price);
        let recapture_rate = v.rate("Recapture rate", &self.recapture_rate);

        if let (Some(cost), Some(depreciation)) = (cost_basis, accumulated_depreciation) {
            v.ensure(depreciation <= cost, ValidationError::DepreciationExceedsBasis);
        }

        match (cost_basis, accumulated_depreciation, sale_price, recapture_rate) {
            (
                Some(cost_basis),
                Some(accumulated_depreciation),
                Some(sale_price),
                Some(recapture_rate),
            ) if v.is_clean() => Ok(DepreciationRecaptureInput {
                cost_basis,
                accumulated_depreciation,
                sale_price,
                recapture_rate,
            }),
            _ => Err(v.into_errors()),
        }
    }
}

impl FormFields for DepreciationRecaptureForm {
    const FIELDS: &'static [&'static str] = &[
        "cost_basis",
        "accumulated_depreciation",
        "sale_price",
        "recapture_rate",
    ];

    fn field_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut String> {
        match name {
            "cost_basis" => Some(&mut self.cost_basis),
            "accumulated_depreciation" => Some(&mut self.accumulated_depreciation),
            "sale_price" => Some(&mut self.sale_price),
            "recapture_rate" => Some(&mut self.recapture_rate),
            _ => None,
        }
    }
}

impl Calculator for DepreciationRecaptureForm {
    type Figures = DepreciationRecaptureResult;

    fn calculate(
        &self,
        _rules: &ExchangeRules,
    ) -> CalculationResult<DepreciationRecaptureResult> {
        self.validate()
            .map(|input| derive_depreciation_recapture(&input))
            .into()
    }
}

/// Derives the recapture base, the tax on it, and what remains of the sale.
pub fn derive_depreciation_recapture(
    input: &DepreciationRecaptureInput
) -> DepreciationRecaptureResult {
    let adjusted_basis = round_half_up(input.cost_basis - input.accumulated_depreciation);
    let total_gain = round_half_up(input.sale_price - adjusted_basis);
    let recapture_base = recapture_base(input.accumulated_depreciation, total_gain);
    let recapture_tax = apply_rate(recapture_base, input.recapture_rate);

    DepreciationRecaptureResult {
        adjusted_basis,
        total_gain,
        recapture_base,
        recapture_tax,
        net_after_recapture: round_half_up(input.sale_price - recapture_tax),
        capital_gain_portion: round_half_up(non_negative(total_gain) - recapture_base),
    }
}

/// Depreciation subject to recapture: bounded by both the depreciation taken
/// and the gain realized, and zero on a loss.
fn recapture_base(
    depreciation: Decimal,
    total_gain: Decimal,
) -> Decimal {
    if total_gain < Decimal::ZERO {
        warn!(
            total_gain = %total_gain,
            "sale realizes a loss; nothing to recapture"
        );
    }
    round_half_up(depreciation.min(non_negative(total_gain)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;

    fn test_form() -> DepreciationRecaptureForm {
        DepreciationRecaptureForm {
            cost_basis: "500000".to_string(),
            accumulated_depreciation: "100000".to_string(),
            sale_price: "750000".to_string(),
            recapture_rate: "25".to_string(),
        }
    }

    fn input(
        cost: Decimal,
        depreciation: Decimal,
        sale: Decimal,
    ) -> DepreciationRecaptureInput {
        DepreciationRecaptureInput {
            cost_basis: cost,
            accumulated_depreciation: depreciation,
            sale_price: sale,
            recapture_rate: dec!(25),
        }
    }

    /// Initializes tracing subscriber for tests that exercise log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // recapture_base tests
    // =========================================================================

    #[test]
    fn recapture_base_limited_by_depreciation() {
        assert_eq!(recapture_base(dec!(100000), dec!(350000)), dec!(100000));
    }

    #[test]
    fn recapture_base_limited_by_gain() {
        assert_eq!(recapture_base(dec!(100000), dec!(40000)), dec!(40000));
    }

    #[test]
    fn recapture_base_zero_on_loss() {
        let _guard = init_test_tracing();

        assert_eq!(recapture_base(dec!(100000), dec!(-20000)), Decimal::ZERO);
    }

    #[test]
    fn recapture_base_stays_within_both_bounds() {
        let samples = [
            (dec!(0), dec!(0)),
            (dec!(0), dec!(500)),
            (dec!(500), dec!(0)),
            (dec!(100000), dec!(100000)),
            (dec!(100000), dec!(99999.99)),
            (dec!(250000.50), dec!(-1)),
            (dec!(1), dec!(1000000)),
        ];

        for (depreciation, gain) in samples {
            let base = recapture_base(depreciation, gain);
            let bound = depreciation.min(non_negative(gain));
            assert!(base >= Decimal::ZERO);
            assert_eq!(base, bound);
        }
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_accepts_depreciation_equal_to_cost() {
        let mut form = test_form();
        form.accumulated_depreciation = "500000".to_string();

        assert!(form.validate().is_ok());
    }

    #[test]
    fn validate_rejects_depreciation_above_cost() {
        let mut form = test_form();
        form.accumulated_depreciation = "500000.01".to_string();

        assert_eq!(
            form.validate(),
            Err(vec![ValidationError::DepreciationExceedsBasis])
        );
    }

    #[test]
    fn validate_skips_cross_check_when_cost_missing() {
        let mut form = test_form();
        form.cost_basis = String::new();

        assert_eq!(
            form.validate(),
            Err(vec![ValidationError::Required {
                field: "Original cost basis".to_string()
            }])
        );
    }

    #[test]
    fn validate_requires_positive_cost_and_sale_price() {
        let mut form = test_form();
        form.cost_basis = "0".to_string();
        form.sale_price = "0".to_string();

        let messages: Vec<String> = form
            .validate()
            .unwrap_err()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            messages,
            vec![
                "Original cost basis must be greater than zero".to_string(),
                "Sale price must be greater than zero".to_string(),
            ]
        );
    }

    // =========================================================================
    // derive tests
    // =========================================================================

    #[test]
    fn derive_reference_scenario() {
        let result = derive_depreciation_recapture(&input(dec!(500000), dec!(100000), dec!(750000)));

        assert_eq!(result.adjusted_basis, dec!(400000));
        assert_eq!(result.total_gain, dec!(350000));
        assert_eq!(result.recapture_base, dec!(100000));
        assert_eq!(result.recapture_tax, dec!(25000));
        assert_eq!(result.net_after_recapture, dec!(725000));
        assert_eq!(result.capital_gain_portion, dec!(250000));
    }

    #[test]
    fn derive_fully_depreciated_property() {
        let result = derive_depreciation_recapture(&input(dec!(300000), dec!(300000), dec!(200000)));

        assert_eq!(result.adjusted_basis, Decimal::ZERO);
        assert_eq!(result.total_gain, dec!(200000));
        assert_eq!(result.recapture_base, dec!(200000));
        assert_eq!(result.capital_gain_portion, Decimal::ZERO);
    }

    #[test]
    fn derive_sale_at_loss_recaptures_nothing() {
        let result = derive_depreciation_recapture(&input(dec!(500000), dec!(50000), dec!(400000)));

        assert_eq!(result.total_gain, dec!(-50000));
        assert_eq!(result.recapture_base, Decimal::ZERO);
        assert_eq!(result.recapture_tax, Decimal::ZERO);
        assert_eq!(result.net_after_recapture, dec!(400000));
        assert_eq!(result.capital_gain_portion, Decimal::ZERO);
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
            [max, max, max, "100"],
            [max, "0", tiny, "100"],
            [tiny, tiny, max, "99.9999999999999999999999999"],
            [fine, fine, fine, tiny],
            [max, tiny, "1000000000000.01", "100"],
        ];

        for [cost_basis, depreciation, sale_price, rate] in cases {
            let form = DepreciationRecaptureForm {
                cost_basis: cost_basis.to_string(),
                accumulated_depreciation: depreciation.to_string(),
                sale_price: sale_price.to_string(),
                recapture_rate: rate.to_string(),
            };

            let result = form.calculate(&ExchangeRules::default());

            assert!(result.is_valid() || !result.errors().is_empty());
        }
    }
}
