//! Validation helpers
//!
//! Field-level checks and normalisation shared by the request handlers.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

pub const MAX_HOURS: f64 = 24.0;

lazy_static! {
    static ref PLATE_PATTERN: Regex = Regex::new(r"^[A-Z0-9\- ]{2,10}$").unwrap();
}

/// Validate and parse a `YYYY-MM-DD` date
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Hours must be a finite number in `0..=24`
pub fn validate_hours(hours: f64) -> Result<(), ValidationError> {
    if !hours.is_finite() || hours < 0.0 || hours > MAX_HOURS {
        let mut error = ValidationError::new("hours");
        error.add_param("value".into(), &hours.to_string());
        return Err(error);
    }
    Ok(())
}

/// Trimmed, upper-cased plate
pub fn normalize_plate(plate: &str) -> String {
    plate.trim().to_uppercase()
}

/// An empty plate is allowed (unknown vehicle); otherwise 2-10 letters,
/// digits, hyphens or spaces. Expects a normalised plate.
pub fn validate_plate(plate: &str) -> Result<(), ValidationError> {
    if plate.is_empty() || PLATE_PATTERN.is_match(plate) {
        return Ok(());
    }
    let mut error = ValidationError::new("plate");
    error.add_param("value".into(), &plate.to_string());
    Err(error)
}

/// Trim an optional text field, collapsing blank values to `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert_eq!(
            validate_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(validate_date("2023-02-29").is_err());
        assert!(validate_date("02/01/2024").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_validate_hours() {
        assert!(validate_hours(0.0).is_ok());
        assert!(validate_hours(24.0).is_ok());
        assert!(validate_hours(-0.5).is_err());
        assert!(validate_hours(24.1).is_err());
        assert!(validate_hours(f64::NAN).is_err());
    }

    #[test]
    fn test_plate_rules() {
        assert_eq!(normalize_plate("  abc-123 "), "ABC-123");
        assert!(validate_plate("").is_ok());
        assert!(validate_plate("ABC 123").is_ok());
        assert!(validate_plate("A").is_err());
        assert!(validate_plate("ABC_123").is_err());
        assert!(validate_plate("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("  ".to_string())), None);
        assert_eq!(normalize_optional(Some(" x ".to_string())), Some("x".to_string()));
        assert_eq!(normalize_optional(None), None);
    }
}
