//! Infrastructure layer - storage backends, hashing and logging

pub mod logging;
pub mod role;
pub mod storage;
pub mod user;
pub mod user_role;
