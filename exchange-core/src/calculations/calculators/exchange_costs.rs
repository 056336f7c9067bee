//! Exchange cost estimator.
//!
//! Sums the itemized closing costs of an exchange. When the property value
//! is supplied, the total is also expressed as a percentage of it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::calculations::session::{Calculator, FormFields};
use crate::calculations::validation::{FieldValidator, ValidationError};
use crate::models::{CalculationResult, ExchangeRules};

/// Smallest property value the percentage is computed against.
///
/// With every cost capped at [`MAX_AMOUNT`], this keeps the percentage
/// within [`Decimal`] range.
///
/// [`MAX_AMOUNT`]: crate::calculations::validation::MAX_AMOUNT
pub const MIN_PROPERTY_VALUE: Decimal = dec!(0.01);

/// Raw text inputs for the cost estimator.
///
/// `property_value` is optional; leave it blank to skip the percentage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeCostForm {
    pub qi_fee: String,
    pub escrow_fee: String,
    pub title_insurance: String,
    pub recording_fees: String,
    #[serde(default)]
    pub property_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeCostInput {
    /// Qualified intermediary fee.
    pub qi_fee: Decimal,
    pub escrow_fee: Decimal,
    pub title_insurance: Decimal,
    pub recording_fees: Decimal,
    pub property_value: Option<Decimal>,
}

/// One line of the cost breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostLine {
    pub label: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeCostResult {
    pub items: Vec<CostLine>,
    pub total_costs: Decimal,

    /// Total as a percentage (0-100 scale) of the property value, when given.
    pub costs_as_percent_of_value: Option<Decimal>,
}

impl ExchangeCostForm {
    pub fn validate(&self) -> Result<ExchangeCostInput, Vec<ValidationError>> {
        let mut v = FieldValidator::new();

        let qi_fee = v.non_negative("QI fee", &self.qi_fee);
        let escrow_fee = v.non_negative("Escrow fee", &self.escrow_fee);
        let title_insurance = v.non_negative("Title insurance", &self.title_insurance);
        let recording_fees = v.non_negative("Recording fees", &self.recording_fees);
        let property_value = if self.property_value.trim().is_empty() {
            Some(None)
        } else {
            v.positive_at_least("Property value", &self.property_value, MIN_PROPERTY_VALUE)
                .map(Some)
        };

        match (
            qi_fee,
            escrow_fee,
            title_insurance,
            recording_fees,
            property_value,
        ) {
            (
                Some(qi_fee),
                Some(escrow_fee),
                Some(title_insurance),
                Some(recording_fees),
                Some(property_value),
            ) if v.is_clean() => Ok(ExchangeCostInput {
                qi_fee,
                escrow_fee,
                title_insurance,
                recording_fees,
                property_value,
            }),
            _ => Err(v.into_errors()),
        }
    }
}

impl FormFields for ExchangeCostForm {
    const FIELDS: &'static [&'static str] = &[
        "qi_fee",
        "escrow_fee",
        "title_insurance",
        "recording_fees",
        "property_value",
    ];

    fn field_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut String> {
        match name {
            "qi_fee" => Some(&mut self.qi_fee),
            "escrow_fee" => Some(&mut self.escrow_fee),
            "title_insurance" => Some(&mut self.title_insurance),
            "recording_fees" => Some(&mut self.recording_fees),
            "property_value" => Some(&mut self.property_value),
            _ => None,
        }
    }
}

impl Calculator for ExchangeCostForm {
    type Figures = ExchangeCostResult;

    fn calculate(
        &self,
        _rules: &ExchangeRules,
    ) -> CalculationResult<ExchangeCostResult> {
        self.validate()
            .map(|input| derive_exchange_costs(&input))
            .into()
    }
}

/// Itemizes and totals the exchange costs.
pub fn derive_exchange_costs(input: &ExchangeCostInput) -> ExchangeCostResult {
    let items = vec![
        line("QI fee", input.qi_fee),
        line("Escrow fee", input.escrow_fee),
        line("Title insurance", input.title_insurance),
        line("Recording fees", input.recording_fees),
    ];
    let total_costs = round_half_up(items.iter().map(|item| item.amount).sum());
    let costs_as_percent_of_value = input.property_value.and_then(|value| {
        let percent = total_costs
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.checked_div(value));
        if percent.is_none() {
            warn!(property_value = %value, "cost percentage out of range, omitted");
        }
        percent.map(round_half_up)
    });

    ExchangeCostResult {
        items,
        total_costs,
        costs_as_percent_of_value,
    }
}

fn line(
    label: &str,
    amount: Decimal,
) -> CostLine {
    CostLine {
        label: label.to_string(),
        amount: round_half_up(amount),
    }
}
