//! Password hashing utilities using Argon2

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as HashError, PasswordHash,
        PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

use super::legacy;
use crate::config::PasswordConfig;
use crate::domain::{DomainError, PasswordHasher};

/// Argon2id password hasher producing PHC strings
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Create a hasher with the library's default parameters
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Create a hasher with explicit cost parameters
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, DomainError> {
        let params = Params::new(memory_kib, iterations, parallelism, None).map_err(|e| {
            DomainError::configuration(format!("Invalid Argon2 parameters: {}", e))
        })?;

        Ok(Self { params })
    }

    /// Create a hasher from the `password` configuration section
    pub fn from_config(config: &PasswordConfig) -> Result<Self, DomainError> {
        Self::with_params(config.memory_kib, config.iterations, config.parallelism)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        if legacy::is_legacy_hash(hash) {
            return legacy::verify(password, hash);
        }

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| DomainError::malformed_credential(format!("Unparsable hash: {}", e)))?;

        // Cost parameters come from the PHC string, not from `self.params`
        match self.argon2().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(DomainError::malformed_credential(format!(
                "Unverifiable hash: {}",
                e
            ))),
        }
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        if legacy::is_legacy_hash(hash) {
            return true;
        }

        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        match Params::try_from(&parsed_hash) {
            Ok(params) => {
                params.m_cost() != self.params.m_cost()
                    || params.t_cost() != self.params.t_cost()
                    || params.p_cost() != self.params.p_cost()
            }
            Err(_) => false,
        }
    }
}
