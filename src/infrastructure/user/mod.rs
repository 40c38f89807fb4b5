//! User infrastructure module
//!
//! This module provides implementations for user accounts, including
//! Argon2 password hashing, legacy hash verification, in-memory and
//! PostgreSQL repositories, and the account service.

mod legacy;
mod password;
pub(crate) mod postgres_repository;
mod repository;
mod service;

pub use password::Argon2Hasher;
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{AccountService, ChangePasswordRequest, RegisterUserRequest};
