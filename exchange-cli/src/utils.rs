use rust_decimal::{Decimal, RoundingStrategy};

/// Formats a monetary amount as US dollars with thousands separators and
/// exactly two decimal places, e.g. `$1,085,000.00` or `-$50,000.00`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = to_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a 0-100 scale percentage, e.g. `1.25%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", to_cents(value))
}

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
