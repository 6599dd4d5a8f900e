//! Argon2id password hashes in PHC string form.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::Rng;
use tracing::error;

use crate::error::AppError;

const SALT_BYTES: usize = 16;

pub fn hash_password(password: &str, params: &Params) -> Result<String, AppError> {
    let mut raw_salt = [0u8; SALT_BYTES];
    rand::rng().fill(&mut raw_salt);
    let salt = SaltString::encode_b64(&raw_salt)
        .map_err(|e| AppError::internal(format!("salt encoding failed: {e}")))?;
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params.clone())
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            AppError::internal("password hashing failed")
        })
}

/// Check `password` against a stored hash. The cost is read from the hash,
/// so hashes made under older params keep verifying.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!(error = %e, "stored password hash is malformed");
            false
        }
    }
}
