//! Storage infrastructure - backend selection and PostgreSQL plumbing

mod factory;
mod postgres;
pub mod schema;

pub use factory::{AccountRepositories, StorageConfig, StorageFactory, StorageType};
pub use postgres::{map_sqlx_error, unique_violation, PostgresConfig};
pub use schema::SCHEMA_SQL;
