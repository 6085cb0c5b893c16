//! Credential checks run before anything reaches a provider.

use crate::error::ValidationError;

pub const MIN_PASSWORD_LEN: usize = 4;
pub const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidEmail(email.to_string());
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || host.starts_with('.') || tld.len() < 2 {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_LEN.contains(&username.trim().chars().count()) {
        return Err(ValidationError::UsernameLength {
            min: *USERNAME_LEN.start(),
            max: *USERNAME_LEN.end(),
        });
    }
    Ok(())
}
