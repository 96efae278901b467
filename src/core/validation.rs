//! Input validation shared by the entry forms.
//!
//! All checks run before any store call. Failures carry the message shown to
//! the operator.

use crate::errors::{Error, Result};
use chrono::NaiveDate;

/// Minimum digits in a contact number.
pub const MIN_CONTACT_DIGITS: usize = 10;

/// Digits in a national identity number (CNIC).
pub const CNIC_DIGITS: usize = 13;

/// Trims `value` and fails with `message` if nothing is left.
pub fn required(value: &str, message: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(message));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional field, mapping blank input to `None`.
#[must_use]
pub fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Accepts contact numbers made only of digits, at least ten of them.
pub fn contact_number(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.len() < MIN_CONTACT_DIGITS || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(
            "Contact must be at least 10 digits",
        ));
    }
    Ok(trimmed.to_string())
}

/// Accepts a CNIC of exactly 13 digits, with or without dashes.
pub fn cnic(value: &str) -> Result<String> {
    let trimmed = value.trim();
    let digits: String = trimmed.chars().filter(|c| *c != '-').collect();
    if digits.len() != CNIC_DIGITS || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(
            "CNIC must be exactly 13 digits (with or without dashes)",
        ));
    }
    Ok(trimmed.to_string())
}

/// Parses a strict `YYYY-MM-DD` date that exists on the calendar.
pub fn calendar_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    let well_formed = trimmed.len() == 10
        && trimmed.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(Error::validation("Date must be in YYYY-MM-DD format"));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| Error::validation("Date must be a real calendar date"))
}

/// Parses a strictly positive, finite amount such as a salary.
pub fn positive_amount(value: &str) -> Result<f64> {
    let amount = amount(value)?;
    if amount <= 0.0 {
        return Err(Error::InvalidAmount {
            input: value.trim().to_string(),
        });
    }
    Ok(amount)
}

/// Parses a finite amount.
pub fn amount(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(Error::InvalidAmount {
            input: trimmed.to_string(),
        }),
    }
}
