//! Relational schema expected by the PostgreSQL repositories.
//!
//! Applying it is left to whatever deploys the database; the CLI only prints it.

/// DDL for the `users`, `roles` and `user_roles` tables
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGSERIAL PRIMARY KEY,
    username VARCHAR(64) NOT NULL,
    email VARCHAR(64) NOT NULL,
    password VARCHAR(255),
    jwt_auth_active BOOLEAN NOT NULL DEFAULT FALSE,
    date_joined TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT users_username_key UNIQUE (username),
    CONSTRAINT users_email_key UNIQUE (email)
);

CREATE TABLE IF NOT EXISTS roles (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(36) NOT NULL,
    slug VARCHAR(36) NOT NULL,
    CONSTRAINT roles_slug_key UNIQUE (slug)
);

CREATE TABLE IF NOT EXISTS user_roles (
    user_id BIGINT NOT NULL REFERENCES users(id),
    role_id BIGINT NOT NULL REFERENCES roles(id),
    PRIMARY KEY (user_id, role_id)
);

CREATE INDEX IF NOT EXISTS idx_user_roles_role_id ON user_roles(role_id);
"#;

/// Unique constraint names the repositories translate into messages
pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const ROLES_SLUG_KEY: &str = "roles_slug_key";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_declares_all_tables() {
        for table in ["users", "roles", "user_roles"] {
            assert!(SCHEMA_SQL.contains(&format!("CREATE TABLE IF NOT EXISTS {} (", table)));
        }
    }

    #[test]
    fn test_schema_names_unique_constraints() {
        for constraint in [USERS_USERNAME_KEY, USERS_EMAIL_KEY, ROLES_SLUG_KEY] {
            assert!(SCHEMA_SQL.contains(constraint));
        }
        assert!(SCHEMA_SQL.contains("PRIMARY KEY (user_id, role_id)"));
    }
}
