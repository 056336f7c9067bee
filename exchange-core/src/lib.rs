//! Calculation engine for 1031 like-kind exchanges.
//!
//! Six calculators (boot, debt relief, depreciation recapture, replacement
//! value, exchange costs and identification rules) plus a deadline timeline.
//! All money is [`rust_decimal::Decimal`], rounded half-up to cents.

pub mod calculations;
pub mod models;

pub use calculations::{Calculator, CalculatorSession, FormFields, UnknownFieldError, ValidationError};
pub use models::*;
