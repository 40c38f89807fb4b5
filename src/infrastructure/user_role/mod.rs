//! Membership infrastructure module
//!
//! In-memory and PostgreSQL implementations of the user/role join table.

mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresUserRoleRepository;
pub use repository::InMemoryUserRoleRepository;
