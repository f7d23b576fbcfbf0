//! Common utility functions for withholding calculations.
//!
//! Rounding happens at the boundary of every sub-computation, to the
//! precision chosen by the caller.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to `precision` places using half-up rounding.
///
/// Values exactly halfway between two representable results are rounded away
/// from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use withholding_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454), 2), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455), 2), dec!(-123.46)); // Away from zero
/// assert_eq!(round_half_up(dec!(123.5), 0), dec!(124));
/// ```
pub fn round_half_up(
    value: Decimal,
    precision: u32,
) -> Decimal {
    value.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use withholding_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps negative values to zero.
pub fn non_negative(value: Decimal) -> Decimal {
    max(value, Decimal::ZERO)
}

/// Largest magnitude accepted for a caller-supplied amount.
///
/// Keeps every derived annual total far below `Decimal::MAX`, so the stages
/// can use plain arithmetic.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// Clamps `value` into `[-AMOUNT_LIMIT, AMOUNT_LIMIT]`.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use withholding_core::calculations::common::{AMOUNT_LIMIT, bounded_amount};
///
/// assert_eq!(bounded_amount(dec!(2500.00)), dec!(2500.00));
/// assert_eq!(bounded_amount(Decimal::MAX), AMOUNT_LIMIT);
/// assert_eq!(bounded_amount(Decimal::MIN), -AMOUNT_LIMIT);
/// ```
pub fn bounded_amount(value: Decimal) -> Decimal {
    value.clamp(-AMOUNT_LIMIT, AMOUNT_LIMIT)
}
