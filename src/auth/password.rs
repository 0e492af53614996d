//! bcrypt hashing for account secrets.
//!
//! The credential store persists only the hash; the plaintext secret
//! exists in memory for the duration of registration or login.

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash an account secret with bcrypt at the default cost.
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Check a candidate secret against a stored bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_only_original_secret() {
        let hashed = hash_password("feeder-follower-9").unwrap();

        assert!(verify_password("feeder-follower-9", &hashed).unwrap());
        assert!(!verify_password("feeder-follower-8", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("hunter22").unwrap();
        let b = hash_password("hunter22").unwrap();

        assert_ne!(a, b);
        assert!(verify_password("hunter22", &a).unwrap());
        assert!(verify_password("hunter22", &b).unwrap());
    }
}
