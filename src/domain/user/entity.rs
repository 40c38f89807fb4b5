//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::credential::PasswordHasher;
use super::validation::{validate_email, validate_username, UserValidationError};
use crate::domain::role::Role;
use crate::domain::DomainError;

/// User identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User account record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// `None` until the user is first saved
    id: Option<UserId>,
    username: String,
    email: String,
    /// Password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: Option<String>,
    /// Whether token-based auth is currently enabled for this account
    jwt_auth_active: bool,
    /// Set once at creation
    date_joined: DateTime<Utc>,
}

impl User {
    /// Create a new, unsaved user without a password
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: email.into(),
            password_hash: None,
            jwt_auth_active: false,
            date_joined: Utc::now(),
        }
    }

    /// Rebuild a user loaded from storage
    pub fn from_storage(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: Option<String>,
        jwt_auth_active: bool,
        date_joined: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            username: username.into(),
            email: email.into(),
            password_hash,
            jwt_auth_active,
            date_joined,
        }
    }

    // Getters

    pub fn id(&self) -> Option<UserId> {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> Option<&str> {
        self.password_hash.as_deref()
    }

    pub fn date_joined(&self) -> DateTime<Utc> {
        self.date_joined
    }

    pub fn is_jwt_auth_active(&self) -> bool {
        self.jwt_auth_active
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    // Credentials

    /// Hash `password` and store only the hash.
    ///
    /// The record must be saved afterwards for the change to persist.
    pub fn set_password<H>(&mut self, hasher: &H, password: &str) -> Result<(), DomainError>
    where
        H: PasswordHasher + ?Sized,
    {
        self.password_hash = Some(hasher.hash(password)?);
        Ok(())
    }

    /// Check `password` against the stored hash.
    ///
    /// A user without a password never matches.
    pub fn check_password<H>(&self, hasher: &H, password: &str) -> Result<bool, DomainError>
    where
        H: PasswordHasher + ?Sized,
    {
        match &self.password_hash {
            Some(hash) => hasher.verify(password, hash),
            None => Ok(false),
        }
    }

    /// Store an already derived hash, e.g. when importing accounts
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = Some(password_hash.into());
    }

    // Mutators

    /// Change the email. Uniqueness is checked when the user is saved.
    pub fn update_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Change the username. Uniqueness is checked when the user is saved.
    pub fn update_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn set_jwt_auth_active(&mut self, active: bool) {
        self.jwt_auth_active = active;
    }

    /// Record the id generated on first insert
    pub fn assign_id(&mut self, id: UserId) {
        self.id = Some(id);
    }

    /// Check the column constraints of the user
    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_username(&self.username)?;
        validate_email(&self.email)
    }

    /// Shallow projection for transport to external callers
    pub fn to_dict(&self, roles: Vec<Role>) -> UserDict {
        UserDict {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            roles,
        }
    }
}

/// Transport shape of a user, without any credential material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDict {
    #[serde(rename = "_id")]
    pub id: Option<UserId>,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
}
