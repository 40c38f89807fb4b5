//! Role infrastructure module
//!
//! In-memory and PostgreSQL implementations of the role repository.

pub(crate) mod postgres_repository;
mod repository;

pub use postgres_repository::PostgresRoleRepository;
pub use repository::InMemoryRoleRepository;
