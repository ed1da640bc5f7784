//! Registration input checks
//!
//! The boundary layer is expected to validate requests already; these checks
//! are repeated here because uniqueness and hashing depend on them.

use std::sync::OnceLock;

use regex::Regex;

use super::result::{CredentialError, Result};

/// Minimum password length, in characters
pub const MIN_PASSWORD_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Check that a string has the syntactic form of an email address
pub fn is_valid_email(email: &str) -> bool {
    // The regex crate has no lookaround, so the dot rules are checked by hand
    !email.starts_with('.') && !email.contains("..") && email_regex().is_match(email)
}

/// Validate the fields of a registration request
pub fn validate_registration(name: &str, username: &str, email: &str, password: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(CredentialError::invalid_input("name must not be empty"));
    }
    if username.trim().is_empty() {
        return Err(CredentialError::invalid_input("username must not be empty"));
    }
    if !is_valid_email(email) {
        return Err(CredentialError::invalid_input("email is not a valid address"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CredentialError::invalid_input(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(is_valid_email("o'neil@example.ie"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plainaddress"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email(".a@x.com"));
        assert!(!is_valid_email("a..b@x.com"));
        assert!(!is_valid_email("a.@x.com"));
        assert!(!is_valid_email("a@-x.com"));
    }

    #[test]
    fn test_accepts_valid_registration() {
        assert!(validate_registration("Alice", "alice1", "a@x.com", "secret1").is_ok());
    }

    #[test]
    fn test_password_length_boundary() {
        assert!(validate_registration("Alice", "alice1", "a@x.com", "123456").is_ok());
        let err = validate_registration("Alice", "alice1", "a@x.com", "12345").unwrap_err();
        assert_eq!(err.kind(), "invalid_input");
    }

    #[test]
    fn test_password_length_counts_characters() {
        // Six characters, more than six bytes
        assert!(validate_registration("Alice", "alice1", "a@x.com", "éééééé").is_ok());
    }

    #[test]
    fn test_rejects_blank_name_and_username() {
        let err = validate_registration("  ", "alice1", "a@x.com", "secret1").unwrap_err();
        assert!(err.to_string().contains("name"));

        let err = validate_registration("Alice", "", "a@x.com", "secret1").unwrap_err();
        assert!(err.to_string().contains("username"));
    }

    #[test]
    fn test_rejects_bad_email() {
        let err = validate_registration("Alice", "alice1", "not-an-email", "secret1").unwrap_err();
        assert!(matches!(err, CredentialError::InvalidInput(_)));
    }
}
