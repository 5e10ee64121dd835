//! The derivation rule: month label, included-day count and expected DRR of a row.
//!
//! Everything here is a pure function of a row's inputs. Degenerate inputs
//! (inverted dates, over-counted exclusions, non-numeric lead counts) produce
//! degenerate values instead of errors.

use crate::domain::model::{DateLocale, Derived, Row};
use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Derived values of a row whose span is not fully set yet.
pub fn empty_span() -> Derived {
    Derived {
        month: String::new(),
        day_count: 0,
        expected_drr: format_drr(0.0),
    }
}

pub fn recompute(row: &Row, locale: DateLocale) -> Derived {
    let (start, end) = match (row.start_date, row.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => return empty_span(),
    };

    let day_count = total_days(start, end) - excluded_count(&row.excluded_dates, locale);
    let expected_drr = if day_count > 0 {
        parse_lead_count(&row.lead_count) / day_count as f64
    } else {
        0.0
    };

    Derived {
        month: month_label(start),
        day_count,
        expected_drr: format_drr(expected_drr),
    }
}

/// Whole days from `start` to `end`; negative when the range is inverted.
pub fn total_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

/// Number of distinct excluded dates once normalized to locale strings.
pub fn excluded_count(dates: &[NaiveDate], locale: DateLocale) -> i64 {
    let distinct: BTreeSet<String> = dates.iter().map(|d| locale.format_date(*d)).collect();
    distinct.len() as i64
}

/// "January 2024"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// Numeric reading of the raw lead-count text, following JavaScript `Number()`
/// coercion: blank reads as zero, `Infinity` with an optional sign and the
/// `0x`/`0b`/`0o` integer literals are accepted, anything else that is not a
/// plain decimal literal is NaN.
pub fn parse_lead_count(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }

    // f64::from_str also takes "inf" and "nan" spellings; keep to decimal syntax.
    let decimal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if decimal {
        trimmed.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Unsigned `0x1f`, `0b101`, `0o17`. `None` when there is no such prefix.
fn parse_radix_literal(text: &str) -> Option<f64> {
    let radix = match text.get(..2)? {
        "0x" | "0X" => 16,
        "0b" | "0B" => 2,
        "0o" | "0O" => 8,
        _ => return None,
    };

    let digits = &text[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }

    let value = digits
        .chars()
        .try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix)
                .map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN);
    Some(value)
}

pub fn format_drr(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let label = if value > 0.0 { "Infinity" } else { "-Infinity" };
        label.to_string()
    } else {
        // ties round away from zero, as toFixed does
        let rounded = format!("{:.2}", (value * 100.0).round() / 100.0);
        // no signed zero
        if rounded == "-0.00" {
            "0.00".to_string()
        } else {
            rounded
        }
    }
}
