//! Argon2 hashing and the password strength rule.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use validator::ValidationError;

use crate::error::{UserError, UserResult};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
const SPECIAL_CHARS: &str = "@$!%*?&";

pub fn hash_password(password: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::PasswordHash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> UserResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| UserError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// 8 to 128 characters from `[A-Za-z0-9@$!%*?&]`, with at least one
/// lowercase letter, uppercase letter, digit and special character.
pub fn check_strength(password: &str) -> Result<(), &'static str> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters");
    }
    if len > MAX_PASSWORD_LEN {
        return Err("Password cannot exceed 128 characters");
    }
    if !password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || SPECIAL_CHARS.contains(c))
    {
        return Err("Password may only contain letters, digits and @$!%*?&");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit");
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err("Password must contain at least one special character (@$!%*?&)");
    }
    Ok(())
}

/// `#[validate(custom(function = ...))]` adapter for [`check_strength`].
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    check_strength(password).map_err(|msg| {
        let mut err = ValidationError::new("password_strength");
        err.message = Some(msg.into());
        err
    })
}
