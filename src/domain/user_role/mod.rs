//! User/role membership domain

mod entity;
mod repository;

pub use entity::UserRole;
pub use repository::UserRoleRepository;
