//! Registration input policy.

use super::AuthError;

/// Minimum password length in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

pub const PASSWORD_POLICY_MESSAGE: &str = "Password must be at least 8 characters long and contain uppercase, lowercase, and numbers";

/// Loose shape check: `local@domain.tld`, no whitespace, non-empty labels.
pub fn validate_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !host.ends_with('.'),
        None => false,
    }
}

/// At least [`MIN_PASSWORD_LEN`] characters with upper-case, lower-case and digit.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Check a registration request, returning the first violated rule.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::Validation("All fields are required".into()));
    }
    if !validate_email(email) {
        return Err(AuthError::Validation("Invalid email format".into()));
    }
    if !validate_password(password) {
        return Err(AuthError::Validation(PASSWORD_POLICY_MESSAGE.into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        for ok in ["a@x.com", "first.last@sub.example.org", "a+tag@x.io"] {
            assert!(validate_email(ok), "{ok} should pass");
        }
        for bad in ["", "ax.com", "@x.com", "a@x", "a@.com", "a@x.", "a b@x.com", "a@@x.com", "a@x..com"] {
            assert!(!validate_email(bad), "{bad} should fail");
        }
    }

    #[test]
    fn password_policy() {
        assert!(validate_password("Password1"));
        assert!(!validate_password("Pass1"));
        assert!(!validate_password("password1"));
        assert!(!validate_password("PASSWORD1"));
        assert!(!validate_password("Passwordx"));
    }

    #[test]
    fn registration_checks_in_order() {
        let msg = |r: Result<(), AuthError>| match r {
            Err(AuthError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert_eq!(msg(validate_registration(" ", "a@x.com", "Password1")), "All fields are required");
        assert_eq!(msg(validate_registration("alice", "nope", "weak")), "Invalid email format");
        assert_eq!(msg(validate_registration("alice", "a@x.com", "weak")), PASSWORD_POLICY_MESSAGE);
        assert!(validate_registration("alice", "a@x.com", "Password1").is_ok());
    }
}
