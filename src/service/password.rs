//! One-way password hashing.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$...`), so the salt and
//! parameters travel with the stored value.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

use crate::error::GatehouseError;

/// Hash `plain` with a fresh random salt.
pub fn hash_password(plain: &str) -> Result<String, GatehouseError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(plain.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `plain` against a stored PHC string.
/// A stored value that does not parse never verifies.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}
