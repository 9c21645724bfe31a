//! Money is stored in minor units (cents) as `i64`. Users type amounts in
//! major units with no decimals, the way prices are quoted at the counter.

use crate::errors::{AppError, AppResult};

pub const CENTS_PER_UNIT: i64 = 100;

/// Parse a whole amount in major units into cents.
///
/// Thousands separators (`.`, `,`, `_`, spaces) are ignored; anything else
/// that is not a digit is rejected.
pub fn parse_major_units(input: &str) -> AppResult<i64> {
    let trimmed = input.trim();
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | '_' | ' '))
        .collect();

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidAmount(input.to_string()));
    }

    digits
        .parse::<i64>()
        .ok()
        .and_then(|v| v.checked_mul(CENTS_PER_UNIT))
        .ok_or_else(|| AppError::InvalidAmount(input.to_string()))
}

pub fn major_to_cents(major: i64) -> AppResult<i64> {
    if major < 0 {
        return Err(AppError::InvalidAmount(major.to_string()));
    }
    major
        .checked_mul(CENTS_PER_UNIT)
        .ok_or_else(|| AppError::InvalidAmount(major.to_string()))
}

/// `11500000` → `$115,000.00`
pub fn format_cents(cents: i64, symbol: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let major = (abs / CENTS_PER_UNIT as u64).to_string();
    let minor = abs % CENTS_PER_UNIT as u64;

    let mut grouped = String::with_capacity(major.len() + major.len() / 3);
    for (i, ch) in major.chars().enumerate() {
        if i > 0 && (major.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{symbol}{grouped}.{minor:02}")
}
