//! Input validation for the billing calculator and the places that parse user input.

use serde::{Deserialize, Deserializer, Serializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{price_schedule::PriceSchedule, reading::Reading};

/// The calendar date format used everywhere a date crosses a text boundary.
///
/// Dates never carry a time or zone component.
pub const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Errors for input that cannot be billed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The text could not be parsed as a `YYYY-MM-DD` calendar date.
    #[error("\"{0}\" is not a valid date, expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The text could not be parsed as a number.
    #[error("\"{0}\" is not a valid number")]
    InvalidNumber(String),

    /// A numeric field was NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite {
        /// The name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A numeric field was below zero.
    #[error("{field} cannot be negative, got {value}")]
    Negative {
        /// The name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Parse a `YYYY-MM-DD` string into a [Date].
///
/// # Errors
/// Returns [ValidationError::InvalidDate] if `text` is not a valid calendar date.
pub fn parse_iso_date(text: &str) -> Result<Date, ValidationError> {
    Date::parse(text.trim(), ISO_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(text.to_owned()))
}

/// Parse a meter index or price typed into a form.
///
/// # Errors
/// Returns [ValidationError::InvalidNumber] if `text` is not a number, or the
/// errors of [validate_amount] if it is not finite or is negative.
pub fn parse_amount(field: &'static str, text: &str) -> Result<f64, ValidationError> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidNumber(text.to_owned()))?;

    validate_amount(field, value)
}

/// Check that `value` is finite and not negative.
pub fn validate_amount(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }

    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }

    Ok(value)
}

/// Check every numeric field of a reading.
pub fn validate_reading(reading: &Reading) -> Result<(), ValidationError> {
    validate_amount("electricity index", reading.electricity_index)?;
    validate_amount("water index", reading.water_index)?;

    Ok(())
}

/// Check every numeric field of a price schedule.
pub fn validate_price_schedule(schedule: &PriceSchedule) -> Result<(), ValidationError> {
    validate_amount("electricity price", schedule.electricity_price)?;
    validate_amount("water price", schedule.water_price)?;
    validate_amount("base rent", schedule.base_rent)?;

    Ok(())
}

/// Serde adapter that writes and reads dates as `YYYY-MM-DD` strings.
pub mod iso_date {
    use super::*;

    /// Serialize `date` as a `YYYY-MM-DD` string.
    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(ISO_DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&text)
    }

    /// Deserialize a `YYYY-MM-DD` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;

        parse_iso_date(&text).map_err(serde::de::Error::custom)
    }
}
