use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Well-formed Argon2id hash with the default cost parameters and an all-zero digest.
const DECOY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Password hashing implementation.
///
/// Provides salted one-way password hashing (internally uses Argon2id).
/// Every call to [`PasswordHasher::hash`] draws a fresh salt, so hashing the
/// same plaintext twice yields two different PHC strings.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// The digest comparison inside argon2 is constant time. A stored hash
    /// that cannot be parsed never matches.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Run a full verification against a decoy hash and discard the outcome.
    ///
    /// Lets a lookup miss cost as much as a wrong password.
    pub fn verify_decoy(&self, password: &str) {
        let _ = self.verify(password, DECOY_HASH);
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "Abcd12!@";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher.verify(password, &hash));
        assert!(!hasher.verify("wrong_password", &hash));
    }

    #[test]
    fn test_single_character_variations_are_rejected() {
        let hasher = PasswordHasher::new();
        let password = "Abcd12!@";
        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(!hasher.verify("abcd12!@", &hash));
        assert!(!hasher.verify("Abcd12!", &hash));
        assert!(!hasher.verify("Abcd12!@x", &hash));
        assert!(!hasher.verify("Abcd13!@", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("Abcd12!@").expect("Failed to hash password");
        let second = hasher.hash("Abcd12!@").expect("Failed to hash password");

        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
    }

    #[test]
    fn test_decoy_hash_uses_default_cost() {
        let parsed = PasswordHash::new(DECOY_HASH).expect("decoy hash must parse");
        assert_eq!(parsed.algorithm.as_str(), "argon2id");

        let fresh = PasswordHasher::new()
            .hash("Abcd12!@")
            .expect("Failed to hash password");
        let header = |hash: &str| hash.split('$').take(4).collect::<Vec<_>>().join("$");
        assert_eq!(header(DECOY_HASH), header(&fresh));

        assert!(!PasswordHasher::new().verify("Abcd12!@", DECOY_HASH));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify("password", "invalid_hash"));
        assert!(!hasher.verify("password", ""));
    }
}
