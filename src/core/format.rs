//! Display formatting for prices and market magnitudes.
//!
//! All functions are pure and never panic; non-finite input renders as
//! whatever `f64`'s `Display` gives for it.

/// Renders `value` as US dollars.
///
/// Values of at least one dollar use exactly 2 fraction digits. Smaller values
/// keep up to 6 fraction digits (never fewer than 2) so sub-cent assets stay
/// legible.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    let digits = if value >= 1.0 { 2 } else { 6 };
    let fixed = format!("{abs:.digits$}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = trim_fraction(frac_part, 2);
    format!("{sign}${}.{frac}", group_thousands(int_part))
}

/// Abbreviates large magnitudes with a T/B/M suffix and 2 decimals, falling
/// back to [`format_currency`] below one million.
pub fn format_large_number(value: f64) -> String {
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else if value >= 1e9 {
        format!("${:.2}B", value / 1e9)
    } else if value >= 1e6 {
        format!("${:.2}M", value / 1e6)
    } else {
        format_currency(value)
    }
}

/// Renders a signed 24h change as an arrow plus absolute percentage.
pub fn format_change(pct: f64) -> String {
    let arrow = if pct >= 0.0 { '▲' } else { '▼' };
    format!("{arrow} {:.2}%", pct.abs())
}

/// Thousands-grouped plain number with up to 3 fraction digits.
pub fn format_supply(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = trim_fraction(frac_part, 0);
    if frac.is_empty() {
        format!("{sign}{}", group_thousands(int_part))
    } else {
        format!("{sign}{}.{frac}", group_thousands(int_part))
    }
}

/// Like [`format_supply`] but an uncapped supply renders as `∞`.
pub fn format_max_supply(value: Option<f64>) -> String {
    value
        .filter(|v| *v > 0.0)
        .map_or_else(|| "∞".to_string(), format_supply)
}

fn trim_fraction(frac: &str, min_digits: usize) -> &str {
    let trimmed = frac.trim_end_matches('0');
    if trimmed.len() >= min_digits {
        trimmed
    } else {
        &frac[..min_digits.min(frac.len())]
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
