//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on reasonable UX limits for names, notes
//! and addresses; the document store has no built-in length enforcement.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: product, category, user display name, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Review comments, product descriptions
pub const MAX_COMMENT_LEN: usize = 2000;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Shipping / billing addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

// ── Checkout validation ─────────────────────────────────────────────

/// 校验印度手机号: 10 位数字, 首位 6-9
pub fn is_valid_mobile_number(value: &str) -> bool {
    let mut chars = value.chars();
    matches!(chars.next(), Some('6'..='9'))
        && value.len() == 10
        && chars.all(|c| c.is_ascii_digit())
}

/// Validate a checkout mobile number, with the user-facing message kept
/// identical across both order paths.
pub fn validate_mobile_number(value: &str) -> Result<(), AppError> {
    if !is_valid_mobile_number(value) {
        return Err(AppError::validation(
            "Invalid mobile number. Please enter a 10-digit number starting with 6, 7, 8, or 9.",
        ));
    }
    Ok(())
}

/// Validate a review rating (1-5 stars)
pub fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_number_leading_digit() {
        assert!(is_valid_mobile_number("9123456789"));
        assert!(is_valid_mobile_number("6000000000"));
        // Leading digit 5 is rejected
        assert!(!is_valid_mobile_number("5123456789"));
        assert!(!is_valid_mobile_number("0123456789"));
    }

    #[test]
    fn test_mobile_number_length() {
        assert!(!is_valid_mobile_number("912345678"));
        assert!(!is_valid_mobile_number("91234567890"));
        assert!(!is_valid_mobile_number(""));
    }

    #[test]
    fn test_mobile_number_non_digits() {
        assert!(!is_valid_mobile_number("912345678a"));
        assert!(!is_valid_mobile_number("9123 45678"));
        // Unicode digits must not slip through the ascii check
        assert!(!is_valid_mobile_number("912345678٩"));
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Wardrobe", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}
