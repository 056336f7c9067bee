//! Replacement property value calculator.
//!
//! Computes the smallest replacement purchase that reinvests all remaining
//! equity, and a buffered "recommended" figure on top of it.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Net proceeds: sale price − mortgage − exchange costs − cash to receive |
//! | 2    | Equity to reinvest: line 1 |
//! | 3    | Minimum replacement value: line 2 + new mortgage |
//! | 4    | Recommended replacement value: line 3 × (1 + buffer rate) |
//!
//! The buffer rate comes from [`ExchangeRules::replacement_buffer_rate`]
//! (5% by default).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use exchange_core::calculations::calculators::ReplacementValueForm;
//! use exchange_core::{Calculator, ExchangeRules};
//!
//! let form = ReplacementValueForm {
//!     sale_price: "1000000".into(),
//!     mortgage: "500000".into(),
//!     exchange_costs: "15000".into(),
//!     cash_to_receive: "0".into(),
//!     new_mortgage: "600000".into(),
//! };
//!
//! let figures = form.calculate(&ExchangeRules::default()).into_result().unwrap();
//!
//! assert_eq!(figures.net_proceeds, dec!(485000));
//! assert_eq!(figures.minimum_replacement_value, dec!(1085000));
//! assert_eq!(figures.recommended_replacement_value, dec!(1139250));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{non_negative, round_half_up};
use crate::calculations::session::{Calculator, FormFields};
use crate::calculations::validation::{FieldValidator, ValidationError};
use crate::models::{CalculationResult, ExchangeRules};

/// Raw text inputs for the replacement value calculator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementValueForm {
    pub sale_price: String,
    pub mortgage: String,
    pub exchange_costs: String,
    pub cash_to_receive: String,
    pub new_mortgage: String,
}

/// Validated replacement value inputs.
///
/// `mortgage <= sale_price` and
/// `cash_to_receive + exchange_costs <= sale_price - mortgage` hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementValueInput {
    pub sale_price: Decimal,
    pub mortgage: Decimal,
    pub exchange_costs: Decimal,
    pub cash_to_receive: Decimal,
    pub new_mortgage: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementValueResult {
    pub net_proceeds: Decimal,
    pub equity_to_reinvest: Decimal,
    pub minimum_replacement_value: Decimal,
    pub recommended_replacement_value: Decimal,

    /// Relinquished debt not replaced by the new mortgage. Becomes mortgage
    /// boot unless offset with added cash.
    pub debt_replacement_shortfall: Decimal,
}

impl ReplacementValueForm {
    /// Parses and range-checks every field, then applies the cross-field limits.
    ///
    /// The net-proceeds limit is only checked once the mortgage is known to
    /// fit within the sale price.
    pub fn validate(&self) -> Result<ReplacementValueInput, Vec<ValidationError>> {
        let mut v = FieldValidator::new();

        let sale_price = v.positive("Sale price", &self.sale_price);
        let mortgage = v.non_negative("Relinquished mortgage", &self.mortgage);
        let exchange_costs = v.non_negative("Exchange costs", &self.exchange_costs);
        let cash_to_receive = v.non_negative("Cash to receive", &self.cash_to_receive);
        let new_mortgage = v.non_negative("New mortgage amount", &self.new_mortgage);

        if let (Some(sale_price), Some(mortgage)) = (sale_price, mortgage) {
            let mortgage_fits = mortgage <= sale_price;
            v.ensure(mortgage_fits, ValidationError::MortgageExceedsSalePrice);

            if let (true, Some(costs), Some(cash)) = (mortgage_fits, exchange_costs, cash_to_receive)
            {
                v.ensure(
                    cash + costs <= sale_price - mortgage,
                    ValidationError::WithdrawalExceedsNetProceeds,
                );
            }
        }

        match (
            sale_price,
            mortgage,
            exchange_costs,
            cash_to_receive,
            new_mortgage,
        ) {
            (
                Some(sale_price),
                Some(mortgage),
                Some(exchange_costs),
                Some(cash_to_receive),
                Some(new_mortgage),
            ) if v.is_clean() => Ok(ReplacementValueInput {
                sale_price,
                mortgage,
                exchange_costs,
                cash_to_receive,
                new_mortgage,
            }),
            _ => Err(v.into_errors()),
        }
    }
}

impl FormFields for ReplacementValueForm {
    const FIELDS: &'static [&'static str] = &[
        "sale_price",
        "mortgage",
        "exchange_costs",
        "cash_to_receive",
        "new_mortgage",
    ];

    fn field_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut String> {
        match name {
            "sale_price" => Some(&mut self.sale_price),
            "mortgage" => Some(&mut self.mortgage),
            "exchange_costs" => Some(&mut self.exchange_costs),
            "cash_to_receive" => Some(&mut self.cash_to_receive),
            "new_mortgage" => Some(&mut self.new_mortgage),
            _ => None,
        }
    }
}

impl Calculator for ReplacementValueForm {
    type Figures = ReplacementValueResult;

    fn calculate(
        &self,
        rules: &ExchangeRules,
    ) -> CalculationResult<ReplacementValueResult> {
        let calculator = ReplacementValueCalculator::new(rules.replacement_buffer_rate);
        self.validate()
            .map(|input| calculator.calculate(&input))
            .into()
    }
}

/// Derives replacement targets with a fixed buffer rate.
#[derive(Debug, Clone)]
pub struct ReplacementValueCalculator {
    buffer_rate: Decimal,
}

impl ReplacementValueCalculator {
    /// `buffer_rate` is a fraction: 0.05 adds 5% to the minimum value.
    pub fn new(buffer_rate: Decimal) -> Self {
        Self { buffer_rate }
    }

    pub fn calculate(
        &self,
        input: &ReplacementValueInput,
    ) -> ReplacementValueResult {
        let net_proceeds = self.net_proceeds(input);
        let equity_to_reinvest = net_proceeds;
        let minimum_replacement_value = round_half_up(equity_to_reinvest + input.new_mortgage);
        let recommended_replacement_value = self.recommended_value(minimum_replacement_value);

        debug!(
            minimum = %minimum_replacement_value,
            recommended = %recommended_replacement_value,
            "replacement targets derived"
        );

        ReplacementValueResult {
            net_proceeds,
            equity_to_reinvest,
            minimum_replacement_value,
            recommended_replacement_value,
            debt_replacement_shortfall: round_half_up(non_negative(
                input.mortgage - input.new_mortgage,
            )),
        }
    }

    fn net_proceeds(
        &self,
        input: &ReplacementValueInput,
    ) -> Decimal {
        round_half_up(
            input.sale_price - input.mortgage - input.exchange_costs - input.cash_to_receive,
        )
    }

    fn recommended_value(
        &self,
        minimum: Decimal,
    ) -> Decimal {
        round_half_up(minimum.saturating_mul(Decimal::ONE.saturating_add(self.buffer_rate)))
    }
}
