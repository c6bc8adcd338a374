use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles")
});

/// Field-level constraints checked before anything reaches storage.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

pub fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {} characters (got {})",
            field, min, max, len
        )));
    }
    Ok(())
}

pub fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), AppError> {
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {} (got {})",
            field, min, max, value
        )));
    }
    Ok(())
}

pub fn check_email(field: &str, value: &str) -> Result<(), AppError> {
    check_length(field, value, 5, 120)?;
    if !EMAIL_RE.is_match(value) {
        return Err(AppError::Validation(format!("{} is not a valid email address", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(check_length("name", "Ñandú", 1, 5).is_ok());
        assert!(check_length("name", "", 1, 5).is_err());
        assert!(check_length("name", "abcdef", 1, 5).is_err());
    }

    #[test]
    fn range_is_inclusive() {
        assert!(check_range("semester", 1, 1, 10).is_ok());
        assert!(check_range("semester", 10, 1, 10).is_ok());
        assert!(check_range("semester", 0, 1, 10).is_err());
        assert!(check_range("semester", 11, 1, 10).is_err());
    }

    #[test]
    fn email_format() {
        assert!(check_email("email", "a@x.com").is_ok());
        assert!(check_email("email", "ana.perez@uni.edu.co").is_ok());
        assert!(check_email("email", "not-an-email").is_err());
        assert!(check_email("email", "a b@x.com").is_err());
        assert!(check_email("email", "a@x").is_err());
    }
}
