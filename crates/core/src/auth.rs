//! Application password handling with Argon2id.
//!
//! The app is gated by a single password; the credential is kept as an
//! Argon2id PHC hash and verified on every login.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Minimum accepted length for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash a password.
    #[error("failed to hash password: {0}")]
    Hash(String),

    /// Failed to verify a password.
    #[error("failed to verify password: {0}")]
    Verify(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,

    /// New password failed the minimal strength check.
    #[error("password must be at least 8 characters")]
    TooShort,
}

/// The application's password credential, stored as an Argon2id PHC hash.
#[derive(Debug, Clone)]
pub struct AppPassword {
    hash: String,
}

impl AppPassword {
    /// Hashes a new plaintext password into a credential.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::TooShort` for passwords below the minimum
    /// length and `PasswordError::Hash` if hashing fails.
    pub fn create(plaintext: &str) -> Result<Self, PasswordError> {
        if plaintext.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hash(e.to_string()))?
            .to_string();

        Ok(Self { hash })
    }

    /// Wraps an already-persisted PHC hash.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::InvalidHash` if the string is not a valid
    /// PHC hash.
    pub fn from_hash(hash: String) -> Result<Self, PasswordError> {
        PasswordHash::new(&hash).map_err(|_| PasswordError::InvalidHash)?;
        Ok(Self { hash })
    }

    /// Returns the PHC hash for persistence.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Verifies a login attempt against the stored hash.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::Verify` if verification fails for a reason
    /// other than a wrong password.
    pub fn verify(&self, candidate: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(&self.hash).map_err(|_| PasswordError::InvalidHash)?;

        match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::Verify(e.to_string())),
        }
    }
}
