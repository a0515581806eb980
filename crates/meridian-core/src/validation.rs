//! Input validation helpers.
//!
//! Validators run before any write reaches the store, so bad input never
//! lands on disk. Each returns the specific [`ValidationError`] rather than
//! a bool, so callers can surface the exact field and reason.

use crate::error::ValidationError;

const MAX_NAME_LEN: usize = 120;
const MIN_MOBILE_DIGITS: usize = 7;
const MAX_MOBILE_DIGITS: usize = 15;

/// Validates an item or customer display name: required, trimmed, bounded.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(())
}

/// Validates a mobile number: required, 7 to 15 digits after stripping
/// separators and a leading plus.
pub fn validate_mobile(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field: "mobile" });
    }
    let digits: String = trimmed
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "mobile",
            reason: "must contain only digits",
        });
    }
    if digits.len() < MIN_MOBILE_DIGITS || digits.len() > MAX_MOBILE_DIGITS {
        return Err(ValidationError::InvalidFormat {
            field: "mobile",
            reason: "must be 7 to 15 digits",
        });
    }
    Ok(())
}

/// Prices may be zero (free samples) but never negative.
pub fn validate_price_paise(field: &'static str, paise: i64) -> Result<(), ValidationError> {
    if paise < 0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

/// Stock levels may be zero but never negative.
pub fn validate_stock(stock: i64) -> Result<(), ValidationError> {
    if stock < 0 {
        return Err(ValidationError::Negative { field: "stock" });
    }
    Ok(())
}

/// Sale quantities must be strictly positive.
pub fn validate_quantity(qty: i64) -> Result<(), ValidationError> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive { field: "quantity" });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_rejects_blank_and_overlong() {
        assert!(validate_name("name", "Paracetamol 500mg").is_ok());
        assert_eq!(
            validate_name("name", "   "),
            Err(ValidationError::Required { field: "name" })
        );
        let long = "x".repeat(121);
        assert_eq!(
            validate_name("name", &long),
            Err(ValidationError::TooLong { field: "name", max: 120 })
        );
    }

    #[test]
    fn mobile_accepts_common_formats() {
        assert!(validate_mobile("9876543210").is_ok());
        assert!(validate_mobile("+91 98765 43210").is_ok());
        assert!(validate_mobile("(040) 123-4567").is_ok());
    }

    #[test]
    fn mobile_rejects_bad_input() {
        assert!(validate_mobile("").is_err());
        assert!(validate_mobile("12345").is_err());
        assert!(validate_mobile("12345678901234567").is_err());
        assert!(validate_mobile("98x7654321").is_err());
    }

    #[test]
    fn prices_and_stock_must_not_be_negative() {
        assert!(validate_price_paise("sellPrice", 0).is_ok());
        assert!(validate_price_paise("sellPrice", -1).is_err());
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-5).is_err());
    }

    #[test]
    fn quantity_must_be_positive() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
    }
}
