//! Common validation utilities.

use chrono::NaiveDate;
use validator::ValidationError;

/// Validates the length of a name after surrounding whitespace is removed.
///
/// Names are stored trimmed, so the bounds apply to what is stored. Length is
/// counted in characters.
pub fn validate_trimmed_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Value must not be blank".into());
        return Err(err);
    }

    let len = trimmed.chars().count();
    if len < min || len > max {
        let mut err = ValidationError::new("length");
        err.message = Some(format!("Name must be between {min} and {max} characters").into());
        err.add_param("min".into(), &min);
        err.add_param("max".into(), &max);
        return Err(err);
    }
    Ok(())
}

/// Validates an optional date range.
///
/// Both ends must be given together, and the start must not be after the end.
pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (None, None) => Ok(()),
        (Some(start), Some(end)) if start <= end => Ok(()),
        (Some(_), Some(_)) => {
            let mut err = ValidationError::new("date_range_order");
            err.message = Some("Start date must not be after end date".into());
            Err(err)
        }
        _ => {
            let mut err = ValidationError::new("date_range_incomplete");
            err.message = Some("Start and end date must be given together".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_trimmed_length() {
        assert!(validate_trimmed_length("Jeju", 2, 20).is_ok());
        assert!(validate_trimmed_length("  Jeju  ", 2, 4).is_ok());
        assert!(validate_trimmed_length("부산", 2, 20).is_ok());
        assert_eq!(validate_trimmed_length("", 2, 20).unwrap_err().code, "blank");
        assert_eq!(validate_trimmed_length("   ", 2, 20).unwrap_err().code, "blank");
    }

    #[test]
    fn test_validate_trimmed_length_ignores_padding() {
        let err = validate_trimmed_length(" a ", 2, 20).unwrap_err();
        assert_eq!(err.code, "length");
        assert_eq!(
            err.message.as_deref(),
            Some("Name must be between 2 and 20 characters")
        );
        assert!(validate_trimmed_length(&format!(" {} ", "a".repeat(20)), 2, 20).is_ok());
        assert!(validate_trimmed_length(&"a".repeat(21), 2, 20).is_err());
    }

    #[test]
    fn test_validate_date_range_ordered() {
        assert!(validate_date_range(Some(date(2024, 5, 1)), Some(date(2024, 5, 3))).is_ok());
        assert!(validate_date_range(Some(date(2024, 5, 1)), Some(date(2024, 5, 1))).is_ok());
    }

    #[test]
    fn test_validate_date_range_reversed() {
        let err = validate_date_range(Some(date(2024, 5, 3)), Some(date(2024, 5, 1))).unwrap_err();
        assert_eq!(err.code, "date_range_order");
    }

    #[test]
    fn test_validate_date_range_absent() {
        assert!(validate_date_range(None, None).is_ok());
    }

    #[test]
    fn test_validate_date_range_incomplete() {
        let err = validate_date_range(Some(date(2024, 5, 1)), None).unwrap_err();
        assert_eq!(err.code, "date_range_incomplete");
        assert!(validate_date_range(None, Some(date(2024, 5, 1))).is_err());
    }
}
