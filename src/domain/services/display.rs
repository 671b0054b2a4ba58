//! Text formatting for dashboard figures.
//!
//! Absent or non-finite inputs render as [`PLACEHOLDER`] instead of
//! failing, so a half-populated snapshot still produces a full summary.

use crate::domain::value_objects::pnl::PLACEHOLDER;

/// Fixed-point rendering with `,` between thousands groups.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let digits = integer.as_bytes();
    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3 + 1);
    if value.is_sign_negative() && value != 0.0 {
        grouped.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// `$1,234.56`
pub fn money(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("${}", group_thousands(v, 2)),
        _ => PLACEHOLDER.to_string(),
    }
}

/// `+$1,234.56` for non-negative values, `$-1,234.56` otherwise.
pub fn signed_money(value: f64) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}${}", sign, group_thousands(value, 2))
}

/// Position size with four decimals.
pub fn quantity(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.4}", v),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Market price with between two and six decimals.
pub fn format_price(price: Option<f64>) -> String {
    let price = match price {
        Some(p) if p != 0.0 && p.is_finite() => p,
        _ => return "$0.00".to_string(),
    };

    let mut text = group_thousands(price, 6);
    if let Some(dot) = text.find('.') {
        let min_len = dot + 3;
        while text.len() > min_len && text.ends_with('0') {
            text.pop();
        }
    }
    format!("${}", text)
}

/// 24h volume abbreviated to `K` / `M`.
pub fn format_volume(volume: Option<f64>) -> String {
    let volume = match volume {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => return "$0".to_string(),
    };

    if volume >= 1_000_000.0 {
        format!("${:.2}M", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("${:.2}K", volume / 1_000.0)
    } else {
        format!("${:.2}", volume)
    }
}
