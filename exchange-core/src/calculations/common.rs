//! Shared arithmetic for the exchange calculators.
//!
//! Every calculator reports money rounded to cents with the same half-up
//! convention, and several clamp intermediate figures at zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use exchange_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value at zero from below.
///
/// ```
/// use rust_decimal_macros::dec;
/// use exchange_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-5.00)), dec!(0));
/// assert_eq!(non_negative(dec!(5.00)), dec!(5.00));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Applies a percentage rate expressed on a 0-100 scale, rounded to cents.
///
/// ```
/// use rust_decimal_macros::dec;
/// use exchange_core::calculations::common::apply_rate;
///
/// assert_eq!(apply_rate(dec!(100000), dec!(20)), dec!(20000.00));
/// assert_eq!(apply_rate(dec!(333.33), dec!(15)), dec!(50.00));
/// ```
pub fn apply_rate(
    amount: Decimal,
    rate_percent: Decimal,
) -> Decimal {
    round_half_up(amount * rate_percent / Decimal::ONE_HUNDRED)
}
