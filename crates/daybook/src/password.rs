//! Password strength validation.
//!
//! A password is checked against every [`PasswordRule`] independently, and
//! all failures are reported together in rule order.

use serde::Serialize;

/// Characters that satisfy [`PasswordRule::Special`].
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// Shortest accepted password, in UTF-16 code units.
///
/// UTF-16 units are what browsers and JSON tooling report as a string's
/// length, so a character outside the Basic Multilingual Plane (most emoji)
/// counts twice. Byte length is never used.
pub const MIN_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Special,
}

impl PasswordRule {
    /// Every rule, in reporting order.
    pub const ALL: [PasswordRule; 5] = [
        PasswordRule::MinLength,
        PasswordRule::Uppercase,
        PasswordRule::Lowercase,
        PasswordRule::Digit,
        PasswordRule::Special,
    ];

    pub fn message(self) -> &'static str {
        match self {
            PasswordRule::MinLength => "Password must be at least 8 characters",
            PasswordRule::Uppercase => "Password must contain an uppercase letter",
            PasswordRule::Lowercase => "Password must contain a lowercase letter",
            PasswordRule::Digit => "Password must contain a number",
            PasswordRule::Special => "Password must contain a special character (!@#$%^&*)",
        }
    }

    pub fn is_satisfied_by(self, password: &str) -> bool {
        match self {
            PasswordRule::MinLength => password.encode_utf16().count() >= MIN_LENGTH,
            PasswordRule::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRule::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRule::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRule::Special => password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }
}

/// Outcome of [`validate_password`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordValidation {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Check `password` against every rule and collect the messages of those it fails.
///
/// ```
/// use daybook::password::validate_password;
///
/// let result = validate_password("Abcdef1!");
/// assert!(result.valid);
/// assert!(result.errors.is_empty());
/// ```
pub fn validate_password(password: &str) -> PasswordValidation {
    let errors: Vec<String> = PasswordRule::ALL
        .iter()
        .filter(|rule| !rule.is_satisfied_by(password))
        .map(|rule| rule.message().to_string())
        .collect();

    PasswordValidation {
        valid: errors.is_empty(),
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fails_only(password: &str, rule: PasswordRule) {
        let result = validate_password(password);
        assert!(!result.valid, "{password:?} should be invalid");
        assert_eq!(result.errors, vec![rule.message().to_string()]);
    }

    #[test]
    fn test_valid_password() {
        let result = validate_password("Abcdef1!");
        assert!(result.valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_length_error() {
        let result = validate_password("Ab1!");
        assert!(!result.valid);
        assert!(result
            .errors
            .contains(&"Password must be at least 8 characters".to_string()));
    }

    #[test]
    fn test_missing_uppercase() {
        assert_fails_only("abcdef1!", PasswordRule::Uppercase);
    }

    #[test]
    fn test_missing_lowercase() {
        assert_fails_only("ABCDEFG1!", PasswordRule::Lowercase);
    }

    #[test]
    fn test_missing_number() {
        assert_fails_only("Abcdefg!", PasswordRule::Digit);
    }

    #[test]
    fn test_missing_special() {
        assert_fails_only("Abcdefg1", PasswordRule::Special);
        assert_eq!(
            PasswordRule::Special.message(),
            "Password must contain a special character (!@#$%^&*)"
        );
    }

    #[test]
    fn test_multiple_errors_in_rule_order() {
        let result = validate_password("short");
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![
                "Password must be at least 8 characters",
                "Password must contain an uppercase letter",
                "Password must contain a number",
                "Password must contain a special character (!@#$%^&*)",
            ]
        );
    }

    #[test]
    fn test_empty_password_fails_every_rule() {
        assert_eq!(validate_password("").errors.len(), PasswordRule::ALL.len());
    }

    #[test]
    fn test_length_counts_utf16_units_not_bytes() {
        // Seven characters, more than eight bytes.
        assert!(!PasswordRule::MinLength.is_satisfied_by("Äbcdé1!"));
        assert!(PasswordRule::MinLength.is_satisfied_by("Äbcdéf1!"));
    }

    #[test]
    fn test_length_counts_astral_characters_twice() {
        // Six characters, eight UTF-16 units.
        let result = validate_password("😀😀Ab1!");
        assert!(result.valid, "{:?}", result.errors);
        assert!(!PasswordRule::MinLength.is_satisfied_by("😀Ab1!x"));
    }

    #[test]
    fn test_other_punctuation_is_not_special() {
        assert!(!PasswordRule::Special.is_satisfied_by("Abcdefg1?-_+"));
    }

    #[test]
    fn test_serializes_as_object() {
        let json = serde_json::to_value(validate_password("Abcdef1!")).unwrap();
        assert_eq!(json, serde_json::json!({ "valid": true, "errors": [] }));
    }
}
