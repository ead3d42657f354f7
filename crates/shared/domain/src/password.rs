//! Password value object - one-way Argon2 digests.
//!
//! Plain text passwords only ever pass through [`Password::new`] and
//! [`Password::verify`]; only the PHC-formatted digest is stored.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::error::{DomainError, DomainResult};

/// Argon2 digest of a user's password.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    digest: String,
}

// Don't expose the digest in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("digest", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password with a fresh salt.
    ///
    /// # Errors
    /// Returns a password error if the plain text is blank or shorter than
    /// the minimum length.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        if plain_text.trim().is_empty() {
            return Err(DomainError::password("Password can't be blank"));
        }
        if (plain_text.chars().count() as u64) < MIN_PASSWORD_LENGTH {
            return Err(DomainError::password(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let digest = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {e}")))?
            .to_string();

        Ok(Self { digest })
    }

    /// Wrap a digest loaded from storage.
    pub fn from_hash(digest: String) -> Self {
        Self { digest }
    }

    /// The PHC-formatted digest.
    pub fn as_str(&self) -> &str {
        &self.digest
    }

    /// Consume and return the digest for storage.
    pub fn into_string(self) -> String {
        self.digest
    }

    /// Check a plain text password against this digest.
    ///
    /// A malformed stored digest verifies nothing.
    pub fn verify(&self, plain_text: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.digest) else {
            return false;
        };
        Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("geasss").unwrap();

        assert!(password.verify("geasss"));
        assert!(!password.verify("geasst"));
        assert!(!password.verify(""));
    }

    #[test]
    fn test_password_from_hash() {
        let password = Password::new("foobar").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());

        assert!(restored.verify("foobar"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let pass1 = Password::new("foobar").unwrap();
        let pass2 = Password::new("foobar").unwrap();

        assert_ne!(pass1.as_str(), pass2.as_str());
        assert!(pass1.verify("foobar"));
        assert!(pass2.verify("foobar"));
    }

    #[test]
    fn test_password_too_short() {
        assert!(matches!(Password::new("aaaaa"), Err(DomainError::Password(_))));
    }

    #[test]
    fn test_password_blank() {
        assert!(matches!(Password::new("      "), Err(DomainError::Password(_))));
    }

    #[test]
    fn test_password_minimum_length() {
        assert!(Password::new("123456").is_ok());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let password = Password::from_hash(String::new());
        assert!(!password.verify(""));
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("foobar").unwrap();
        assert!(!format!("{:?}", password).contains("argon2"));
    }
}
