//! Password hashing contract

use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for password hashing operations
pub trait PasswordHasher: Send + Sync + Debug {
    /// Derive a salted one-way hash of a password
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a stored hash.
    ///
    /// Returns `Ok(false)` on mismatch and `Err(MalformedCredential)` when the
    /// stored hash cannot be parsed or uses an unsupported scheme.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;

    /// Whether a stored hash should be replaced with a fresh one
    fn needs_rehash(&self, _hash: &str) -> bool {
        false
    }
}
