//! Municipal trade tax (Gewerbesteuer).
//!
//! The trade income above the allowance is multiplied by the federal base
//! rate of 3.5 % and then by the municipality's multiplier. Corporations
//! get no allowance; sole proprietors and partnerships get
//! [`SOLE_PROPRIETOR_ALLOWANCE`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::common::{max, percent_to_rate, round_half_up};

/// Federal base rate (Steuermesszahl) applied to taxable trade income.
pub const TRADE_TAX_BASE_RATE: Decimal = dec!(0.035);

/// Allowance on trade income for sole proprietors and partnerships.
pub const SOLE_PROPRIETOR_ALLOWANCE: Decimal = dec!(24500);

/// Calculates the trade tax on `profit`.
///
/// `multiplier` is the municipal Hebesatz in percent (`400` for 400 %).
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
/// use steuer_core::calculations::trade_tax;
///
/// assert_eq!(trade_tax(dec!(125000), dec!(250), Decimal::ZERO), dec!(10937.50));
/// ```
pub fn trade_tax(
    profit: Decimal,
    multiplier: Decimal,
    allowance: Decimal,
) -> Decimal {
    let taxable = max(profit - allowance, Decimal::ZERO);
    let base_amount = taxable * TRADE_TAX_BASE_RATE;
    let tax = round_half_up(base_amount * percent_to_rate(multiplier));

    debug!(
        profit = %profit,
        allowance = %allowance,
        multiplier = %multiplier,
        trade_tax = %tax,
        "computed trade tax"
    );

    tax
}
