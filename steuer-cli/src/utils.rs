use rust_decimal::{Decimal, RoundingStrategy};

/// Formats an amount as whole euros with `.` as thousands separator.
///
/// `10000` becomes `"10.000 €"`. Cents are rounded half to even.
pub fn format_currency(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped} €")
}

/// Formats a percentage with two decimals, e.g. `"31.18 %"`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2} %", value)
}
