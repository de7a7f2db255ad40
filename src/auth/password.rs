//! Password hashing and verification.
//!
//! Argon2id with default parameters and a fresh random salt per hash. The
//! output is a PHC string that embeds algorithm, cost, and salt, so
//! verification needs no side-channel state.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::error::AppError;

/// Hash a plaintext password into a PHC string.
pub fn hash(password: &str) -> Result<String, AppError> {
    let salt_bytes: [u8; 16] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("salt encoding failed: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
}

/// Check a plaintext password against a stored hash.
///
/// Returns `false` for both a wrong password and an undecodable hash; the
/// caller must not be able to tell the difference.
pub fn verify(stored_hash: &str, password: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let digest = hash("secret123").unwrap();

        assert!(verify(&digest, "secret123"));
    }

    #[test]
    fn wrong_password_fails() {
        let digest = hash("secret123").unwrap();

        assert!(!verify(&digest, "secret124"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash("secret123").unwrap();
        let b = hash("secret123").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn undecodable_hash_fails_closed() {
        assert!(!verify("not-a-phc-string", "secret123"));
    }
}
