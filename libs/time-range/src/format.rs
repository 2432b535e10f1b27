//! Display helpers for time-series cells.

use jiff::Zoned;
use num_format::{Locale, ToFormattedString};

/// Axis and tooltip label for a point, e.g. `Jun 1, '24` or `Jun '24`.
pub fn chart_date(at: &Zoned, include_day: bool) -> String {
    let format = if include_day { "%b %-d, '%y" } else { "%b '%y" };
    at.strftime(format).to_string()
}

/// Standard notation with thousands grouping and at most `decimals`
/// fraction digits, trailing zeros dropped: `1234.5678` becomes `1,234.57`.
pub fn standard_amount(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
        None => (fixed.as_str(), ""),
    };
    let grouped = match int_part.parse::<u128>() {
        Ok(int) => int.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };

    let is_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    let sign = if value.is_sign_negative() && !is_zero { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}
