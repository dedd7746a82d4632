//! Common utility functions for the tax calculations.
//!
//! Rounding and percentage helpers shared by the evaluators and the report
//! orchestrator. Every derived amount passes through [`round_half_up`] at the
//! point where it is computed.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const HUNDRED: Decimal = dec!(100);

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1003.6443)), dec!(1003.64));
/// assert_eq!(round_half_up(dec!(4418.295)), dec!(4418.30));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-24500.00), dec!(0)), dec!(0));
/// assert_eq!(max(dec!(100500.00), dec!(0)), dec!(100500.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Converts a whole-number percentage (`2.45` for 2.45 %) into a fraction.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::common::percent_to_rate;
///
/// assert_eq!(percent_to_rate(dec!(250)), dec!(2.5));
/// assert_eq!(percent_to_rate(dec!(2.45)), dec!(0.0245));
/// ```
pub fn percent_to_rate(percent: Decimal) -> Decimal {
    percent / HUNDRED
}

/// Expresses `part` as a percentage of `whole`, rounded to two places.
///
/// Returns zero when `whole` is not positive, so ratios over an empty or
/// negative base never divide by zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::common::percent_of;
///
/// assert_eq!(percent_of(dec!(30625), dec!(125000)), dec!(24.50));
/// assert_eq!(percent_of(dec!(10), dec!(0)), dec!(0));
/// ```
pub fn percent_of(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_half_up(part / whole * HUNDRED)
}
