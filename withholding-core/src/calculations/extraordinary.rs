//! Withholding on extraordinary income.

use rust_decimal::Decimal;

use super::common::round_half_up;

/// Extraordinary income times the marginal rate of the month's projected net
/// income. Nothing is withheld on zero or negative extraordinary income.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use withholding_core::calculations::extraordinary_withholding;
///
/// assert_eq!(extraordinary_withholding(dec!(5000.00), dec!(0.14), 2), dec!(700.00));
/// assert_eq!(extraordinary_withholding(dec!(0), dec!(0.14), 2), dec!(0));
/// ```
pub fn extraordinary_withholding(
    extraordinary_income: Decimal,
    marginal_rate: Decimal,
    precision: u32,
) -> Decimal {
    if extraordinary_income <= Decimal::ZERO || marginal_rate <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(extraordinary_income * marginal_rate, precision)
}
