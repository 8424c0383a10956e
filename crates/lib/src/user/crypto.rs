//! Password hashing for the user system
//!
//! Passwords are hashed with Argon2id keyed by an application-wide secret
//! (the pepper), using a fresh random salt per user. The pepper never
//! touches the database, so a leaked table alone is not enough to mount an
//! offline guessing attack.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core},
};

use super::errors::UserError;
use crate::Result;

/// A freshly computed password hash and the salt it was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    /// Argon2 hash string (PHC format)
    pub hash: String,
    /// Random salt (base64 encoded string)
    pub salt: String,
}

/// Hashes and verifies passwords with a configured pepper.
#[derive(Clone)]
pub struct PasswordCodec {
    pepper: Vec<u8>,
}

impl std::fmt::Debug for PasswordCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCodec").finish_non_exhaustive()
    }
}

impl PasswordCodec {
    pub fn new(pepper: impl Into<Vec<u8>>) -> Self {
        Self {
            pepper: pepper.into(),
        }
    }

    fn argon2(&self) -> Result<Argon2<'_>> {
        Argon2::new_with_secret(
            &self.pepper,
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| {
            UserError::HashingFailed {
                reason: format!("Invalid pepper: {e}"),
            }
            .into()
        })
    }

    /// Hash a password with a new random salt.
    pub fn hash(&self, password: impl AsRef<str>) -> Result<PasswordDigest> {
        let salt = SaltString::generate(&mut rand_core::OsRng);

        let hash = self
            .argon2()?
            .hash_password(password.as_ref().as_bytes(), &salt)
            .map_err(|e| UserError::HashingFailed {
                reason: e.to_string(),
            })?
            .to_string();

        Ok(PasswordDigest {
            hash,
            salt: salt.as_str().to_string(),
        })
    }

    /// Verify a password against its stored hash.
    ///
    /// Returns `Ok(())` if the password is correct and
    /// [`UserError::InvalidCredentials`] if it is not.
    pub fn verify(&self, password: impl AsRef<str>, password_hash: impl AsRef<str>) -> Result<()> {
        let parsed_hash = PasswordHash::new(password_hash.as_ref())
            .map_err(|_| UserError::PasswordVerificationFailed)?;

        self.argon2()?
            .verify_password(password.as_ref().as_bytes(), &parsed_hash)
            .map_err(|_| UserError::InvalidCredentials.into())
    }
}
