//! bcrypt password hashing.
//!
//! Both functions are CPU-bound; async callers should run them on a blocking
//! thread.

use crate::error::AuthError;

/// Work factor used unless configured otherwise.
pub const DEFAULT_COST: u32 = 10;

pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(password, cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the tests fast.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("user123", TEST_COST).unwrap();
        assert_ne!(hash, "user123");
        assert!(verify_password("user123", &hash).unwrap());
        assert!(!verify_password("user124", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(matches!(
            verify_password("pw", "not-a-bcrypt-hash"),
            Err(AuthError::Hashing(_))
        ));
    }
}
