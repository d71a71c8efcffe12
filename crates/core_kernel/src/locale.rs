//! Localized number handling
//!
//! Form fields arrive as Spanish-formatted text: `.` groups thousands and
//! `,` separates decimals (`"180.000,50"`). Parsing is lenient on purpose:
//! a half-typed or garbled field must never fail a form, so the `parse_*`
//! functions fall back to zero. The `try_parse_*` variants keep the
//! distinction between "zero" and "unparsable" for callers that need it.
//!
//! Display helpers follow the es-ES conventions used for headline figures:
//! whole currency units, `.` grouping from five integer digits upwards.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Parses a localized decimal, returning `None` when no number can be read
///
/// Every `.` is dropped, the first `,` becomes the decimal point and the
/// longest leading numeric literal is read. Leading whitespace is skipped and
/// anything after the literal is ignored, so `"12 €"` reads as `12`.
pub fn try_parse_localized_decimal(text: &str) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let without_grouping: String = text.chars().filter(|c| *c != '.').collect();
    let normalized = without_grouping.replacen(',', ".", 1);
    parse_leading_float(&normalized)
}

/// Parses a localized decimal, treating anything unreadable as `0`
pub fn parse_localized_decimal(text: &str) -> f64 {
    try_parse_localized_decimal(text).unwrap_or(0.0)
}

/// Reads a leading base-10 integer (`"30 años"` reads as `30`)
pub fn try_parse_leading_integer(text: &str) -> Option<i64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse().ok()
}

/// Reads a leading base-10 integer, treating anything unreadable as `0`
pub fn parse_leading_integer(text: &str) -> i64 {
    try_parse_leading_integer(text).unwrap_or(0)
}

fn parse_leading_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let at = |i: usize| bytes.get(i).copied();

    let mut pos = 0;
    let negative = match at(0) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while at(pos).is_some_and(|b| b.is_ascii_digit()) {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if at(pos) == Some(b'.') {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while at(frac_end).is_some_and(|b| b.is_ascii_digit()) {
            frac_end += 1;
        }
        frac_digits = &s[frac_start..frac_end];
        if !int_digits.is_empty() || !frac_digits.is_empty() {
            pos = frac_end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent = "";
    if matches!(at(pos), Some(b'e') | Some(b'E')) {
        let mut exp_end = pos + 1;
        if matches!(at(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while at(exp_end).is_some_and(|b| b.is_ascii_digit()) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            exponent = &s[pos..exp_end];
        }
    }

    let literal = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "0" } else { frac_digits },
        exponent,
    );
    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds an amount to whole currency units, half away from zero
///
/// Returns `None` for values that have no decimal representation
/// (NaN, infinities, magnitudes beyond `Decimal`).
pub fn round_to_units(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// Formats an amount as whole es-ES currency units (`208425.4` → `"208.425"`)
///
/// Four-digit amounts are not grouped (`"1234"`), matching es-ES minimum
/// grouping digits.
pub fn format_rounded_amount(value: f64) -> String {
    let Some(rounded) = round_to_units(value) else {
        return value.to_string();
    };
    let Some(units) = rounded.to_i128() else {
        return rounded.to_string();
    };
    let digits = units.unsigned_abs().to_string();
    let grouped = if digits.len() >= 5 {
        group_thousands(&digits, '.')
    } else {
        digits
    };
    if units < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a percentage rate with three decimals (`1.0` → `"1.000"`)
pub fn format_rate_percent(rate: f64) -> String {
    format!("{rate:.3}")
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}
