pub const CURRENCY_SYMBOL: &str = "\u{20b9}";

/// Rounds half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

pub fn percentage(part: f64, whole: f64) -> f64 {
    safe_ratio(part, whole) * 100.0
}

/// Two decimals with `,` grouping on the integer part, e.g. `1,234.50`.
pub fn format_amount(value: f64) -> String {
    let fixed = format!("{:.2}", round2(value).abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && round2(value) != 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn format_currency(value: f64) -> String {
    format!("{}{}", CURRENCY_SYMBOL, format_amount(value))
}
