//! Password hashing and verification using Argon2id.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::domain::errors::{DomainError, DomainResult};

/// PHC-formatted hash including salt and parameters.
pub fn hash_password(password: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DomainError::ValidationFailed(format!("Failed to hash password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> DomainResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| DomainError::SerializationError(format!("Invalid password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
