//! # Validation Utilities
//!
//! Input validation helpers.
//!
//! Accepted color-code grammar:
//!
//! ```text
//! color = "#" ( 3HEXDIG / 6HEXDIG )      ; case-insensitive
//! ```

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Returns true when `value` is `#` followed by exactly 3 or 6 hex digits.
pub fn is_color_code(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };

    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Validate a color code submitted by the user.
pub fn validate_color_code(value: &str) -> Result<(), String> {
    validate_not_empty(value, "Color code")?;

    if !is_color_code(value) {
        return Err(format!(
            "'{}' is not a hex color (expected #rgb or #rrggbb)",
            value
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_code_validation() {
        assert!(validate_color_code("#abc").is_ok());
        assert!(validate_color_code("#A1B2C3").is_ok());
        assert!(validate_color_code("#00ff00").is_ok());
        assert!(validate_color_code("").is_err());
        assert!(validate_color_code("   ").is_err());
        assert!(validate_color_code("abc").is_err()); // missing '#'
        assert!(validate_color_code("#abcd").is_err()); // wrong length
        assert!(validate_color_code("#ggg").is_err()); // not hex
        assert!(validate_color_code("#ff00001").is_err());
    }

    #[test]
    fn test_empty_input_reports_field() {
        let err = validate_color_code("").unwrap_err();
        assert_eq!(err, "Color code cannot be empty");
    }

    #[test]
    fn test_non_ascii_is_rejected() {
        assert!(!is_color_code("#ａｂｃ"));
        assert!(!is_color_code("#"));
    }
}
