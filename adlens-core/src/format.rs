//! Formatting helpers shared by the tables, charts and CLI output.
//!
//! Numbers are rendered en-US style: `,` groups thousands and `.` marks decimals.

use crate::metrics_registry::MetricFormat;

/// Placeholder for values an ad does not report.
pub const NOT_AVAILABLE: &str = "N/A";

/// Maximum fraction digits for plain numbers, matching the locale default.
const NUMBER_MAX_FRACTION_DIGITS: usize = 3;

/// Enough fraction digits to print any `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Format a raw value for display.
///
/// - `Currency`: `$1,234.50`
/// - `Percentage`: `12.35%` (no grouping)
/// - `Number` / none: grouped, at most three fraction digits, trailing zeros trimmed
pub fn format_value(value: f64, format: Option<MetricFormat>) -> String {
    match format {
        Some(MetricFormat::Currency) => {
            if value.is_sign_negative() && value != 0.0 {
                format!("-${}", group_fixed(-value, 2))
            } else {
                format!("${}", group_fixed(value, 2))
            }
        }
        Some(MetricFormat::Percentage) => format!("{}%", to_fixed(value, 2)),
        Some(MetricFormat::Number) | None => format_number(value),
    }
}

/// Format a value that may be absent; absent values render as `N/A`.
pub fn format_optional(value: Option<f64>, format: Option<MetricFormat>) -> String {
    match value {
        Some(v) => format_value(v, format),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a plain number with thousands separators.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let negative = value < 0.0;
    let fixed = group_fixed(value.abs(), NUMBER_MAX_FRACTION_DIGITS);
    let trimmed = match fixed.split_once('.') {
        Some((int_part, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int_part.to_string()
            } else {
                format!("{}.{}", int_part, frac)
            }
        }
        None => fixed,
    };

    if negative && trimmed != "0" {
        format!("-{}", trimmed)
    } else {
        trimmed
    }
}

/// Fixed-point rendering with exact ties rounded away from zero (`0.125` -> `0.13`).
///
/// `format!` already rounds every other value to nearest; it only sends ties to even.
fn to_fixed(value: f64, digits: usize) -> String {
    if value.is_finite() && value != 0.0 && is_tie(value, digits) {
        // one ulp further from zero is strictly past the tie
        let nudged = f64::from_bits(value.to_bits() + 1);
        return format!("{:.*}", digits, nudged);
    }
    format!("{:.*}", digits, value)
}

/// True when the exact decimal expansion of `value` is a single `5` past `digits`.
fn is_tie(value: f64, digits: usize) -> bool {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    match exact.split_once('.') {
        Some((_, frac)) if frac.len() > digits => {
            let tail = &frac[digits..];
            tail.starts_with('5') && tail[1..].bytes().all(|b| b == b'0')
        }
        _ => false,
    }
}

/// Render a non-negative value with `digits` fraction digits and grouped integer part.
fn group_fixed(value: f64, digits: usize) -> String {
    let fixed = to_fixed(value, digits);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}.{}", grouped, frac),
        None => grouped,
    }
}

/// Parse a user-typed amount such as `"1,300"`.
///
/// Separators are stripped and the leading integer is taken; anything unparseable is 0.
pub fn parse_formatted_number(input: &str) -> f64 {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    let digits: String = cleaned
        .char_indices()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && (*c == '-' || *c == '+')))
        .map(|(_, c)| c)
        .collect();
    digits.parse::<i64>().map(|n| n as f64).unwrap_or(0.0)
}

/// Shorten a label for chart axes: keeps `max_chars` characters and appends `...`.
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() > max_chars {
        let head: String = name.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}
