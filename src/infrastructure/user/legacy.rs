//! Verification of legacy password hashes
//!
//! Accounts imported from the previous system carry werkzeug-style hashes:
//! `pbkdf2:<digest>:<iterations>$<salt>$<hex>` or
//! `scrypt:<n>:<r>:<p>$<salt>$<hex>`. The salt is used as raw UTF-8 bytes.
//! These hashes are only ever verified; new hashes are always Argon2id.

use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::{Sha256, Sha512};

use crate::domain::DomainError;

const LEGACY_PREFIXES: [&str; 2] = ["pbkdf2:", "scrypt:"];

/// Check whether a stored hash uses one of the legacy formats
pub fn is_legacy_hash(hash: &str) -> bool {
    LEGACY_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}

/// Verify a password against a legacy hash
pub fn verify(password: &str, hash: &str) -> Result<bool, DomainError> {
    let parsed = LegacyHash::parse(hash)?;
    let mut derived = vec![0u8; parsed.expected.len()];
    let (password, salt) = (password.as_bytes(), parsed.salt.as_bytes());

    match parsed.method {
        Method::Pbkdf2 {
            digest: Digest::Sha256,
            iterations,
        } => pbkdf2::<Hmac<Sha256>>(password, salt, iterations, &mut derived),
        Method::Pbkdf2 {
            digest: Digest::Sha512,
            iterations,
        } => pbkdf2::<Hmac<Sha512>>(password, salt, iterations, &mut derived),
        Method::Scrypt { log_n, r, p } => {
            let params = scrypt::Params::new(log_n, r, p, derived.len())
                .map_err(|e| malformed(&format!("invalid scrypt parameters: {}", e)))?;
            scrypt::scrypt(password, salt, &params, &mut derived)
                .map_err(|e| malformed(&format!("invalid scrypt output length: {}", e)))?;
        }
    }

    Ok(constant_time_compare(&derived, &parsed.expected))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Digest {
    Sha256,
    Sha512,
}

impl Digest {
    fn output_len(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Method {
    Pbkdf2 { digest: Digest, iterations: u32 },
    Scrypt { log_n: u8, r: u32, p: u32 },
}

impl Method {
    fn parse(method: &str) -> Result<Self, DomainError> {
        let fields: Vec<&str> = method.split(':').collect();

        match fields.as_slice() {
            ["pbkdf2", digest, iterations] => {
                let digest = match *digest {
                    "sha256" => Digest::Sha256,
                    "sha512" => Digest::Sha512,
                    other => return Err(malformed(&format!("unsupported digest '{}'", other))),
                };

                let iterations = parse_cost(iterations, "iteration count")?;

                Ok(Self::Pbkdf2 { digest, iterations })
            }
            ["scrypt", n, r, p] => {
                let n = parse_cost(n, "scrypt n")?;

                if n < 2 || !n.is_power_of_two() {
                    return Err(malformed("scrypt n must be a power of two"));
                }

                Ok(Self::Scrypt {
                    log_n: n.trailing_zeros() as u8,
                    r: parse_cost(r, "scrypt r")?,
                    p: parse_cost(p, "scrypt p")?,
                })
            }
            _ => Err(malformed(
                "expected pbkdf2:<digest>:<iterations> or scrypt:<n>:<r>:<p>",
            )),
        }
    }

    /// Exact key length for PBKDF2, `None` when any length is accepted
    fn expected_len(&self) -> Option<usize> {
        match self {
            Self::Pbkdf2 { digest, .. } => Some(digest.output_len()),
            Self::Scrypt { .. } => None,
        }
    }
}

fn parse_cost(value: &str, name: &str) -> Result<u32, DomainError> {
    match value.parse::<u32>() {
        Ok(0) => Err(malformed(&format!("{} must be positive", name))),
        Ok(cost) => Ok(cost),
        Err(_) => Err(malformed(&format!("{} is not a number", name))),
    }
}

#[derive(Debug)]
struct LegacyHash<'a> {
    method: Method,
    salt: &'a str,
    expected: Vec<u8>,
}

impl<'a> LegacyHash<'a> {
    fn parse(hash: &'a str) -> Result<Self, DomainError> {
        let mut parts = hash.split('$');
        let (Some(method), Some(salt), Some(hex_digest), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed("expected method$salt$hash"));
        };

        let method = Method::parse(method)?;

        if salt.is_empty() {
            return Err(malformed("empty salt"));
        }

        let expected = hex::decode(hex_digest).map_err(|_| malformed("hash is not hex"))?;

        if expected.is_empty() {
            return Err(malformed("empty hash"));
        }

        if method.expected_len().is_some_and(|len| len != expected.len()) {
            return Err(malformed("hash length does not match digest"));
        }

        Ok(Self {
            method,
            salt,
            expected,
        })
    }
}

fn malformed(reason: &str) -> DomainError {
    DomainError::malformed_credential(format!("Legacy password hash: {}", reason))
}

/// Constant-time byte comparison to prevent timing attacks
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;

    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }

    result == 0
}
