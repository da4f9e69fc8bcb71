//! Validation rules
//!
//! Pure predicates over the raw field values plus the status derivation.
//! The engine decides *when* these run (debounce, deduplication); nothing
//! in this module is time-dependent, which is what makes the rules
//! directly unit-testable.

use crate::model::PasswordStatus;

/// Username length check
///
/// Counts characters, not bytes, so multi-byte input behaves the way a
/// user perceives it.
pub fn username_valid(username: &str, min_chars: usize) -> bool {
    username.chars().count() >= min_chars
}

/// Password strength check
///
/// A password is strong when it contains at least one ASCII lowercase
/// letter, at least one character from `symbols`, and has at least
/// `min_chars` characters.
pub fn password_strong(password: &str, min_chars: usize, symbols: &str) -> bool {
    let has_lowercase = password.chars().any(|c| c.is_ascii_lowercase());
    let has_symbol = password.chars().any(|c| symbols.contains(c));
    has_lowercase && has_symbol && password.chars().count() >= min_chars
}

/// Password emptiness check
pub fn password_empty(password: &str) -> bool {
    password.is_empty()
}

/// Passwords-equal check
pub fn passwords_equal(password: &str, password_again: &str) -> bool {
    password == password_again
}

/// Derive the password status from the three check results
///
/// Priority order, first match wins: empty, then weak, then mismatched.
pub fn derive_status(empty: bool, strong: bool, equal: bool) -> PasswordStatus {
    if empty {
        return PasswordStatus::Empty;
    }
    if !strong {
        return PasswordStatus::NotStrongEnough;
    }
    if !equal {
        return PasswordStatus::RepeatedPasswordWrong;
    }
    PasswordStatus::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;

    fn rules() -> RuleConfig {
        RuleConfig::default()
    }

    #[test]
    fn test_username_boundary() {
        let r = rules();
        assert!(!username_valid("", r.min_username_chars));
        assert!(!username_valid("jo", r.min_username_chars));
        assert!(username_valid("joe", r.min_username_chars));
        assert!(username_valid("joseph", r.min_username_chars));
    }

    #[test]
    fn test_username_counts_chars_not_bytes() {
        // Two characters, six bytes
        assert!(!username_valid("日本", 3));
        assert!(username_valid("日本語", 3));
    }

    #[test]
    fn test_strength_requires_all_three() {
        let r = rules();
        let strong = |p: &str| password_strong(p, r.min_password_chars, &r.required_symbols);

        // Lowercase and symbol but too short
        assert!(!strong("ab$1"));
        // Long enough, lowercase, but no symbol
        assert!(!strong("abc123"));
        // Long enough, symbol, but no lowercase
        assert!(!strong("ABC$123"));
        // All three
        assert!(strong("ab$123"));
        assert!(strong("secret!pw"));
    }

    #[test]
    fn test_strength_symbol_set() {
        let r = rules();
        let strong = |p: &str| password_strong(p, r.min_password_chars, &r.required_symbols);

        for sym in ['$', '@', '#', '!', '%', '*', '?', '&'] {
            assert!(strong(&format!("abcde{sym}")), "symbol {sym} should count");
        }
        // '^' is not in the default set
        assert!(!strong("abcde^"));
    }

    #[test]
    fn test_status_priority() {
        // Empty wins regardless of the other inputs
        assert_eq!(derive_status(true, false, false), PasswordStatus::Empty);
        assert_eq!(derive_status(true, true, true), PasswordStatus::Empty);
        // Then strength
        assert_eq!(
            derive_status(false, false, true),
            PasswordStatus::NotStrongEnough
        );
        assert_eq!(
            derive_status(false, false, false),
            PasswordStatus::NotStrongEnough
        );
        // Then the repeat mismatch
        assert_eq!(
            derive_status(false, true, false),
            PasswordStatus::RepeatedPasswordWrong
        );
        assert_eq!(derive_status(false, true, true), PasswordStatus::Valid);
    }

    #[test]
    fn test_status_from_raw_values() {
        let r = rules();
        let status = |p: &str, again: &str| {
            derive_status(
                password_empty(p),
                password_strong(p, r.min_password_chars, &r.required_symbols),
                passwords_equal(p, again),
            )
        };

        assert_eq!(status("", ""), PasswordStatus::Empty);
        assert_eq!(status("abc", "abc"), PasswordStatus::NotStrongEnough);
        assert_eq!(status("ab$123", "ab$124"), PasswordStatus::RepeatedPasswordWrong);
        assert_eq!(status("ab$123", "ab$123"), PasswordStatus::Valid);
    }
}
