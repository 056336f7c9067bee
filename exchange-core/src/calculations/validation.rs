//! Input validation shared by every calculator.
//!
//! Raw form text is parsed into [`Decimal`] values and checked against range
//! and cross-field constraints. Violations are accumulated in a
//! [`FieldValidator`] rather than returned on the first failure, so a single
//! submission reports every problem at once.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Largest amount any calculator accepts.
///
/// Keeps every derivation comfortably inside [`Decimal`]'s range.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000);

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("static pattern is valid"));

/// A single violated input constraint.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be a valid number")]
    NotANumber { field: String, input: String },

    #[error("{field} cannot be negative")]
    Negative { field: String },

    #[error("{field} must be greater than zero")]
    NotPositive { field: String },

    #[error("{field} must be at least {minimum}")]
    BelowMinimum { field: String, minimum: Decimal },

    #[error("{field} must be between 0 and 100")]
    RateOutOfRange { field: String },

    #[error("{field} exceeds the maximum supported amount")]
    TooLarge { field: String },

    #[error("{field} must be a date in YYYY-MM-DD format")]
    InvalidDate { field: String, input: String },

    #[error("Accumulated depreciation cannot exceed the original cost basis")]
    DepreciationExceedsBasis,

    #[error("Relinquished mortgage cannot exceed the sale price")]
    MortgageExceedsSalePrice,

    #[error(
        "Cash to receive plus exchange costs cannot exceed net proceeds (sale price minus mortgage)"
    )]
    WithdrawalExceedsNetProceeds,

    #[error("At least one identified property is required")]
    NoIdentifiedProperties,
}

/// Strips everything but ASCII digits and the first decimal point.
///
/// This is the per-keystroke filter applied to currency and percentage
/// fields before they are stored in a form.
///
/// ```
/// use exchange_core::calculations::validation::sanitize_numeric_input;
///
/// assert_eq!(sanitize_numeric_input("$1,250,000.50"), "1250000.50");
/// assert_eq!(sanitize_numeric_input("12.5.3%"), "12.53");
/// assert_eq!(sanitize_numeric_input("-40"), "40");
/// ```
pub fn sanitize_numeric_input(raw: &str) -> String {
    let digits_and_points = NON_NUMERIC.replace_all(raw, "");
    let mut seen_point = false;
    digits_and_points
        .chars()
        .filter(|&c| {
            if c != '.' {
                return true;
            }
            let keep = !seen_point;
            seen_point = true;
            keep
        })
        .collect()
}

/// Normalizes a raw amount: trims and removes currency symbols, percent
/// signs, thousands separators and inner whitespace.
fn normalize_amount_input(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '$' | ',' | '%') && !c.is_whitespace())
        .collect()
}

/// Parses a raw amount without applying any range constraint.
///
/// Empty input is reported as [`ValidationError::Required`]; no default is
/// substituted.
pub fn parse_amount(
    field: &str,
    raw: &str,
) -> Result<Decimal, ValidationError> {
    let normalized = normalize_amount_input(raw);
    if normalized.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Decimal::from_str(&normalized).map_err(|e| {
        debug!(field, input = %raw, "amount failed to parse: {}", e);
        ValidationError::NotANumber {
            field: field.to_string(),
            input: raw.to_string(),
        }
    })
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(
    field: &str,
    raw: &str,
) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field: field.to_string(),
        input: raw.to_string(),
    })
}

/// Accumulates validation errors across the fields of one form.
///
/// Each accessor returns `Some(value)` when the field passed, `None` after
/// recording exactly one error for it.
#[derive(Debug, Default)]
pub struct FieldValidator {
    errors: Vec<ValidationError>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an amount that must be zero or greater.
    pub fn non_negative(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Option<Decimal> {
        let value = self.bounded_amount(field, raw)?;
        if value < Decimal::ZERO {
            return self.reject(ValidationError::Negative {
                field: field.to_string(),
            });
        }
        Some(value)
    }

    /// Parses an amount that must be strictly greater than zero.
    pub fn positive(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Option<Decimal> {
        let value = self.bounded_amount(field, raw)?;
        if value <= Decimal::ZERO {
            return self.reject(ValidationError::NotPositive {
                field: field.to_string(),
            });
        }
        Some(value)
    }

    /// Parses a positive amount that must also reach `minimum`.
    pub fn positive_at_least(
        &mut self,
        field: &str,
        raw: &str,
        minimum: Decimal,
    ) -> Option<Decimal> {
        let value = self.positive(field, raw)?;
        if value < minimum {
            return self.reject(ValidationError::BelowMinimum {
                field: field.to_string(),
                minimum,
            });
        }
        Some(value)
    }

    /// Parses a percentage on the 0-100 scale, inclusive at both ends.
    pub fn rate(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Option<Decimal> {
        let value = self.parsed(field, raw)?;
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return self.reject(ValidationError::RateOutOfRange {
                field: field.to_string(),
            });
        }
        Some(value)
    }

    /// Parses a `YYYY-MM-DD` date.
    pub fn date(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Option<NaiveDate> {
        parse_date(field, raw).map_or_else(|e| self.reject(e), Some)
    }

    /// Requires a non-blank free-text value.
    pub fn text(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return self.reject(ValidationError::Required {
                field: field.to_string(),
            });
        }
        Some(trimmed.to_string())
    }

    /// Records `error` unless `holds` is true.
    pub fn ensure(
        &mut self,
        holds: bool,
        error: ValidationError,
    ) {
        if !holds {
            self.errors.push(error);
        }
    }

    /// Records an error that is not tied to one field's parse.
    pub fn push(
        &mut self,
        error: ValidationError,
    ) {
        self.errors.push(error);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consumes the validator, returning the accumulated errors in order.
    pub fn into_errors(self) -> Vec<ValidationError> {
        if !self.errors.is_empty() {
            debug!(count = self.errors.len(), "input rejected");
        }
        self.errors
    }

    fn parsed(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Option<Decimal> {
        parse_amount(field, raw).map_or_else(|e| self.reject(e), Some)
    }

    fn bounded_amount(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Option<Decimal> {
        let value = self.parsed(field, raw)?;
        if value > MAX_AMOUNT {
            return self.reject(ValidationError::TooLarge {
                field: field.to_string(),
            });
        }
        Some(value)
    }

    fn reject<T>(
        &mut self,
        error: ValidationError,
    ) -> Option<T> {
        self.errors.push(error);
        None
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // =========================================================================
    // sanitize_numeric_input tests
    // =========================================================================

    #[test]
    fn sanitize_strips_currency_formatting() {
        assert_eq!(sanitize_numeric_input("$1,000,000"), "1000000");
    }

    #[test]
    fn sanitize_keeps_only_first_decimal_point() {
        assert_eq!(sanitize_numeric_input("1.2.3"), "1.23");
        assert_eq!(sanitize_numeric_input("..5"), ".5");
    }

    #[test]
    fn sanitize_drops_letters_and_signs() {
        assert_eq!(sanitize_numeric_input("abc-12x"), "12");
        assert_eq!(sanitize_numeric_input(""), "");
    }

    // =========================================================================
    // parse_amount tests
    // =========================================================================

    #[test]
    fn parse_amount_accepts_comma_thousands_separator() {
        assert_eq!(parse_amount("Sale price", "1,234.56"), Ok(dec!(1234.56)));
    }

    #[test]
    fn parse_amount_accepts_currency_and_percent_symbols() {
        assert_eq!(parse_amount("Sale price", " $750,000 "), Ok(dec!(750000)));
        assert_eq!(parse_amount("Tax rate", "25%"), Ok(dec!(25)));
    }

    #[test]
    fn parse_amount_empty_is_required_error() {
        assert_eq!(
            parse_amount("Sale price", "   "),
            Err(ValidationError::Required {
                field: "Sale price".to_string()
            })
        );
    }

    #[test]
    fn parse_amount_garbage_is_not_a_number() {
        assert_eq!(
            parse_amount("Sale price", "12abc"),
            Err(ValidationError::NotANumber {
                field: "Sale price".to_string(),
                input: "12abc".to_string(),
            })
        );
    }

    #[test]
    fn parse_amount_keeps_negative_sign_for_range_check() {
        assert_eq!(parse_amount("Sale price", "-5"), Ok(dec!(-5)));
    }

    // =========================================================================
    // parse_date tests
    // =========================================================================

    #[test]
    fn parse_date_accepts_iso_dates() {
        assert_eq!(
            parse_date("Closing date", "2025-01-01"),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
        );
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(matches!(
            parse_date("Closing date", "01/01/2025"),
            Err(ValidationError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse_date("Closing date", "2025-02-30"),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    // =========================================================================
    // FieldValidator tests
    // =========================================================================

    #[test]
    fn non_negative_accepts_zero() {
        let mut v = FieldValidator::new();

        assert_eq!(v.non_negative("Debt", "0"), Some(Decimal::ZERO));
        assert!(v.is_clean());
    }

    #[test]
    fn non_negative_rejects_negative() {
        let mut v = FieldValidator::new();

        assert_eq!(v.non_negative("Debt", "-1"), None);
        assert_eq!(
            v.into_errors(),
            vec![ValidationError::Negative {
                field: "Debt".to_string()
            }]
        );
    }

    #[test]
    fn positive_rejects_zero() {
        let mut v = FieldValidator::new();

        assert_eq!(v.positive("Sale price", "0.00"), None);
        assert_eq!(
            v.into_errors(),
            vec![ValidationError::NotPositive {
                field: "Sale price".to_string()
            }]
        );
    }

    #[test]
    fn amounts_above_maximum_are_rejected() {
        let mut v = FieldValidator::new();

        assert_eq!(v.non_negative("Debt", "1000000000000"), Some(MAX_AMOUNT));
        assert_eq!(v.non_negative("Debt", "1000000000000.01"), None);
        assert_eq!(
            v.into_errors(),
            vec![ValidationError::TooLarge {
                field: "Debt".to_string()
            }]
        );
    }

    #[test]
    fn positive_at_least_rejects_values_below_minimum() {
        let mut v = FieldValidator::new();

        assert_eq!(v.positive_at_least("Property value", "0.01", dec!(0.01)), Some(dec!(0.01)));
        assert_eq!(
            v.positive_at_least("Property value", "0.0000000000000000000000000001", dec!(0.01)),
            None
        );
        assert_eq!(v.positive_at_least("Property value", "0", dec!(0.01)), None);
        assert_eq!(
            v.into_errors()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec![
                "Property value must be at least 0.01".to_string(),
                "Property value must be greater than zero".to_string(),
            ]
        );
    }

    #[test]
    fn rate_accepts_inclusive_bounds() {
        let mut v = FieldValidator::new();

        assert_eq!(v.rate("Tax rate", "0"), Some(Decimal::ZERO));
        assert_eq!(v.rate("Tax rate", "100"), Some(dec!(100)));
        assert!(v.is_clean());
    }

    #[test]
    fn rate_rejects_values_outside_range() {
        let mut v = FieldValidator::new();

        assert_eq!(v.rate("Tax rate", "100.01"), None);
        assert_eq!(v.rate("Tax rate", "-1"), None);
        assert_eq!(v.into_errors().len(), 2);
    }

    #[test]
    fn text_rejects_blank() {
        let mut v = FieldValidator::new();

        assert_eq!(v.text("Property 1 address", "  "), None);
        assert_eq!(v.text("Property 2 address", " 1 Main St "), Some("1 Main St".to_string()));
        assert_eq!(
            v.into_errors(),
            vec![ValidationError::Required {
                field: "Property 1 address".to_string()
            }]
        );
    }

    #[test]
    fn errors_accumulate_in_call_order() {
        let mut v = FieldValidator::new();

        v.positive("Sale price", "");
        v.non_negative("Debt", "-3");
        v.rate("Tax rate", "abc");
        v.ensure(false, ValidationError::MortgageExceedsSalePrice);

        let messages: Vec<String> = v.into_errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Sale price is required".to_string(),
                "Debt cannot be negative".to_string(),
                "Tax rate must be a valid number".to_string(),
                "Relinquished mortgage cannot exceed the sale price".to_string(),
            ]
        );
    }

    #[test]
    fn ensure_ignores_holding_constraints() {
        let mut v = FieldValidator::new();

        v.ensure(true, ValidationError::DepreciationExceedsBasis);

        assert!(v.is_clean());
    }
}
