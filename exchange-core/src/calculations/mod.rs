//! 1031 exchange calculators.
//!
//! Each calculator pairs a form of raw text fields with a pure derivation.
//! Validation and derivation are run together by [`Calculator::calculate`].

pub mod calculators;
pub mod common;
pub mod session;
pub mod timeline;
pub mod validation;

pub use session::{Calculator, CalculatorSession, FormFields, UnknownFieldError};
pub use timeline::{ExchangePhase, ExchangeTimeline, TimelineForm};
pub use validation::ValidationError;
