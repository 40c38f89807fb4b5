//! Account service for authentication, profile updates and role membership

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::role::{Role, RoleId, RoleRepository};
use crate::domain::user::{PasswordHasher, User, UserDict, UserId, UserRepository};
use crate::domain::user_role::{UserRole, UserRoleRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::AccountRepositories;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request for changing a user's password
#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Account service orchestrating users, roles and their memberships
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Create a new account service
    pub fn new(repositories: AccountRepositories, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users: repositories.users,
            roles: repositories.roles,
            user_roles: repositories.user_roles,
            hasher,
        }
    }

    /// Register a new user with a password
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        if self.users.username_exists(&request.username).await? {
            return Err(DomainError::constraint_violation(format!(
                "Username '{}' already exists",
                request.username
            )));
        }

        if self.users.email_exists(&request.email).await? {
            return Err(DomainError::constraint_violation(format!(
                "Email '{}' already exists",
                request.email
            )));
        }

        let mut user = User::new(&request.username, &request.email);
        user.set_password(self.hasher.as_ref(), &request.password)?;

        // The store still enforces uniqueness for concurrent registrations
        self.users.save(&mut user).await?;

        info!(id = ?user.id(), "User registered");
        Ok(user)
    }

    /// Authenticate a user by username or email.
    ///
    /// A login containing `@` is looked up as an email first and as a
    /// username second; any other login is looked up the other way round.
    /// Returns `None` for unknown users and wrong passwords. A malformed
    /// stored hash is an error and never authenticates.
    #[instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        login: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let Some(mut user) = self.find_by_login(login).await? else {
            debug!("Unknown login");
            return Ok(None);
        };

        let matches = user
            .check_password(self.hasher.as_ref(), password)
            .inspect_err(|e| warn!(id = ?user.id(), error = %e, "Stored credential is unusable"))?;

        if !matches {
            debug!(id = ?user.id(), "Password mismatch");
            return Ok(None);
        }

        let stale = user
            .password_hash()
            .is_some_and(|hash| self.hasher.needs_rehash(hash));

        if stale {
            self.upgrade_hash(&mut user, password).await;
        }

        Ok(Some(user))
    }

    /// Look a user up by username or email, with the precedence of `authenticate`
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, DomainError> {
        if login.contains('@') {
            if let Some(user) = self.users.get_by_email(login).await? {
                return Ok(Some(user));
            }
            return self.users.get_by_username(login).await;
        }

        match self.users.get_by_username(login).await? {
            Some(user) => Ok(Some(user)),
            None => self.users.get_by_email(login).await,
        }
    }

    /// Re-derive the hash with the current parameters.
    ///
    /// Failures are logged and leave the stored hash untouched.
    async fn upgrade_hash(&self, user: &mut User, password: &str) {
        let previous = user.password_hash().map(str::to_string);

        let result = match user.set_password(self.hasher.as_ref(), password) {
            Ok(()) => self.users.save(user).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => info!(id = ?user.id(), "Password hash upgraded"),
            Err(e) => {
                warn!(id = ?user.id(), error = %e, "Password hash upgrade failed");

                if let Some(hash) = previous {
                    user.set_password_hash(hash);
                }
            }
        }
    }

    /// Get a user by ID, failing with `NotFound` on a miss
    pub async fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.users.get_by_id(id).await
    }

    /// Get a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.users.get_by_username(username).await
    }

    /// Get a user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.users.get_by_email(email).await
    }

    /// Change a password after checking the current one
    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        id: UserId,
        request: ChangePasswordRequest,
    ) -> Result<User, DomainError> {
        let mut user = self.users.get_by_id(id).await?;

        if !user.check_password(self.hasher.as_ref(), &request.current_password)? {
            return Err(DomainError::validation("Current password is incorrect"));
        }

        user.set_password(self.hasher.as_ref(), &request.new_password)?;
        self.users.save(&mut user).await?;

        info!("Password changed");
        Ok(user)
    }

    /// Replace a password without checking the current one
    #[instrument(skip(self, password))]
    pub async fn reset_password(&self, id: UserId, password: &str) -> Result<User, DomainError> {
        let mut user = self.users.get_by_id(id).await?;

        user.set_password(self.hasher.as_ref(), password)?;
        self.users.save(&mut user).await?;

        info!("Password reset");
        Ok(user)
    }

    /// Change a user's email
    #[instrument(skip(self))]
    pub async fn update_email(&self, id: UserId, email: &str) -> Result<User, DomainError> {
        let mut user = self.users.get_by_id(id).await?;

        user.update_email(email);
        self.users.save(&mut user).await?;

        Ok(user)
    }

    /// Change a user's username
    #[instrument(skip(self))]
    pub async fn update_username(&self, id: UserId, username: &str) -> Result<User, DomainError> {
        let mut user = self.users.get_by_id(id).await?;

        user.update_username(username);
        self.users.save(&mut user).await?;

        Ok(user)
    }

    /// Enable or disable token-based auth for a user
    #[instrument(skip(self))]
    pub async fn set_jwt_auth_active(&self, id: UserId, active: bool) -> Result<User, DomainError> {
        let mut user = self.users.get_by_id(id).await?;

        user.set_jwt_auth_active(active);
        self.users.save(&mut user).await?;

        Ok(user)
    }

    /// Create a new role
    #[instrument(skip(self))]
    pub async fn create_role(&self, name: &str, slug: &str) -> Result<Role, DomainError> {
        let mut role = Role::new(name, slug);
        self.roles.save(&mut role).await?;

        info!(id = ?role.id(), "Role created");
        Ok(role)
    }

    /// List all roles
    pub async fn list_roles(&self) -> Result<Vec<Role>, DomainError> {
        self.roles.list().await
    }

    /// Attach the role with `slug` to a user, returning whether it was new
    #[instrument(skip(self))]
    pub async fn assign_role(&self, user_id: UserId, slug: &str) -> Result<bool, DomainError> {
        let link = self.link(user_id, slug).await?;
        let attached = self.user_roles.attach(&link).await?;

        if attached {
            info!("Role assigned");
        }

        Ok(attached)
    }

    /// Detach the role with `slug` from a user, returning whether it was held
    #[instrument(skip(self))]
    pub async fn revoke_role(&self, user_id: UserId, slug: &str) -> Result<bool, DomainError> {
        let link = self.link(user_id, slug).await?;
        let detached = self.user_roles.detach(&link).await?;

        if detached {
            info!("Role revoked");
        }

        Ok(detached)
    }

    /// Replace all roles of a user with the roles named by `slugs`
    #[instrument(skip(self))]
    pub async fn set_roles(&self, user_id: UserId, slugs: &[String]) -> Result<Vec<Role>, DomainError> {
        self.users.get_by_id(user_id).await?;

        let mut role_ids = Vec::with_capacity(slugs.len());

        for slug in slugs {
            role_ids.push(self.role_id_for(slug).await?);
        }

        self.user_roles.replace_roles(user_id, &role_ids).await?;
        self.user_roles.roles_for_user(user_id).await
    }

    /// Roles held by a user
    pub async fn roles_for(&self, user_id: UserId) -> Result<Vec<Role>, DomainError> {
        self.users.get_by_id(user_id).await?;
        self.user_roles.roles_for_user(user_id).await
    }

    /// Users holding the role with `slug`
    pub async fn users_with_role(&self, slug: &str) -> Result<Vec<User>, DomainError> {
        let role_id = self.role_id_for(slug).await?;
        self.user_roles.users_for_role(role_id).await
    }

    /// Transport projection of a user including their roles
    pub async fn user_dict(&self, id: UserId) -> Result<UserDict, DomainError> {
        let user = self.users.get_by_id(id).await?;
        let roles = self.user_roles.roles_for_user(id).await?;

        Ok(user.to_dict(roles))
    }

    async fn role_id_for(&self, slug: &str) -> Result<RoleId, DomainError> {
        self.roles
            .get_by_slug(slug)
            .await?
            .and_then(|role| role.id())
            .ok_or_else(|| DomainError::not_found(format!("Role '{}' not found", slug)))
    }

    async fn link(&self, user_id: UserId, slug: &str) -> Result<UserRole, DomainError> {
        self.users.get_by_id(user_id).await?;
        let role_id = self.role_id_for(slug).await?;

        Ok(UserRole::new(user_id, role_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::role::InMemoryRoleRepository;
    use crate::infrastructure::storage::StorageFactory;
    use crate::infrastructure::user::Argon2Hasher;
    use crate::infrastructure::user_role::InMemoryUserRoleRepository;

    const LEGACY_HASH: &str = "pbkdf2:sha256:1000$abcdefgh$b8d2ab14f02633b1509b97dd7340cb9ffcac27f5c668824a60db183e80dca4da";

    fn hasher() -> Arc<Argon2Hasher> {
        Arc::new(Argon2Hasher::with_params(1024, 1, 1).unwrap())
    }

    fn create_service() -> AccountService {
        AccountService::new(StorageFactory::create_in_memory(), hasher())
    }

    fn make_request(username: &str, email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    async fn register_alice(service: &AccountService) -> User {
        service
            .register(make_request("alice", "a@x.com", "s3cret"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_register() {
        let service = create_service();

        let user = register_alice(&service).await;

        assert!(user.id().is_some());
        assert_eq!(user.username(), "alice");
        assert_ne!(user.password_hash(), Some("s3cret"));
        assert!(!user.is_jwt_auth_active());
    }

    #[tokio::test]
    async fn test_register_duplicates() {
        let service = create_service();
        register_alice(&service).await;

        let err = service
            .register(make_request("alice", "other@x.com", "pw"))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());

        let err = service
            .register(make_request("alice2", "a@x.com", "pw"))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_alice_scenario() {
        let service = create_service();
        register_alice(&service).await;

        let alice = service.find_by_username("alice").await.unwrap().unwrap();
        let hasher = hasher();

        assert!(alice.check_password(hasher.as_ref(), "s3cret").unwrap());
        assert!(!alice.check_password(hasher.as_ref(), "wrong").unwrap());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let service = create_service();
        let alice = register_alice(&service).await;

        let by_username = service.authenticate("alice", "s3cret").await.unwrap();
        assert_eq!(by_username.unwrap().id(), alice.id());

        let by_email = service.authenticate("a@x.com", "s3cret").await.unwrap();
        assert_eq!(by_email.unwrap().id(), alice.id());

        assert!(service.authenticate("alice", "wrong").await.unwrap().is_none());
        assert!(service.authenticate("nobody", "s3cret").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authenticate_with_malformed_hash() {
        let repos = StorageFactory::create_in_memory();
        let mut user = User::new("mallory", "m@x.com");
        user.set_password_hash("corrupted");
        repos.users.save(&mut user).await.unwrap();

        let service = AccountService::new(repos, hasher());

        let err = service.authenticate("mallory", "corrupted").await.unwrap_err();
        assert!(matches!(err, DomainError::MalformedCredential { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_upgrades_legacy_hash() {
        let repos = StorageFactory::create_in_memory();
        let mut user = User::new("legacy", "l@x.com");
        user.set_password_hash(LEGACY_HASH);
        repos.users.save(&mut user).await.unwrap();
        let id = user.id().unwrap();

        let service = AccountService::new(repos, hasher());

        assert!(service.authenticate("legacy", "wrong").await.unwrap().is_none());
        assert_eq!(
            service.get(id).await.unwrap().password_hash(),
            Some(LEGACY_HASH)
        );

        let user = service.authenticate("legacy", "s3cret").await.unwrap().unwrap();
        let stored = service.get(id).await.unwrap();

        assert!(stored.password_hash().unwrap().starts_with("$argon2id$"));
        assert_eq!(stored.password_hash(), user.password_hash());
        assert!(service.authenticate("legacy", "s3cret").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_authenticate_when_upgrade_cannot_be_saved() {
        let users = Arc::new(MockUserRepository::new());
        let roles = Arc::new(InMemoryRoleRepository::new());
        let repos = AccountRepositories {
            users: users.clone(),
            roles: roles.clone(),
            user_roles: Arc::new(InMemoryUserRoleRepository::new(users.clone(), roles)),
        };

        let mut user = User::new("legacy", "l@x.com");
        user.set_password_hash(LEGACY_HASH);
        users.save(&mut user).await.unwrap();
        let id = user.id().unwrap();

        let service = AccountService::new(repos, hasher());
        users.set_read_only(true).await;

        let user = service.authenticate("legacy", "s3cret").await.unwrap().unwrap();
        assert_eq!(user.password_hash(), Some(LEGACY_HASH));
        assert_eq!(
            service.get(id).await.unwrap().password_hash(),
            Some(LEGACY_HASH)
        );

        users.set_read_only(false).await;
        service.authenticate("legacy", "s3cret").await.unwrap().unwrap();
        assert!(service
            .get(id)
            .await
            .unwrap()
            .password_hash()
            .unwrap()
            .starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_authenticate_email_login_before_matching_username() {
        let service = create_service();

        let squatter = service
            .register(make_request("b@x.com", "squat@x.com", "other"))
            .await
            .unwrap();
        let bob = service
            .register(make_request("bob", "b@x.com", "s3cret"))
            .await
            .unwrap();

        let found = service.authenticate("b@x.com", "s3cret").await.unwrap().unwrap();
        assert_eq!(found.id(), bob.id());

        let found = service.authenticate("b@x.com", "other").await.unwrap();
        assert!(found.is_none());

        // Falls back to the username when no email matches
        let carol = service
            .register(make_request("carol@home", "c@x.com", "pw"))
            .await
            .unwrap();
        let found = service.authenticate("carol@home", "pw").await.unwrap().unwrap();
        assert_eq!(found.id(), carol.id());
        assert!(squatter.id().is_some());

        assert_eq!(
            service.authenticate("bob", "s3cret").await.unwrap().unwrap().id(),
            bob.id()
        );
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let service = create_service();

        let err = service.get(UserId::new(404)).await.unwrap_err();
        assert!(err.is_not_found());

        assert!(service.find_by_email("nobody@x.com").await.unwrap().is_none());
        assert!(service.find_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = create_service();
        let id = register_alice(&service).await.id().unwrap();

        let wrong = ChangePasswordRequest {
            current_password: "nope".to_string(),
            new_password: "n3w".to_string(),
        };
        assert!(matches!(
            service.change_password(id, wrong).await,
            Err(DomainError::Validation { .. })
        ));

        let request = ChangePasswordRequest {
            current_password: "s3cret".to_string(),
            new_password: "n3w".to_string(),
        };
        service.change_password(id, request).await.unwrap();

        assert!(service.authenticate("alice", "s3cret").await.unwrap().is_none());
        assert!(service.authenticate("alice", "n3w").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_reset_password() {
        let service = create_service();
        let id = register_alice(&service).await.id().unwrap();

        service.reset_password(id, "fresh").await.unwrap();

        assert!(service.authenticate("alice", "fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_profile_updates() {
        let service = create_service();
        let alice = register_alice(&service).await;
        let id = alice.id().unwrap();

        service.update_email(id, "alice@example.com").await.unwrap();
        let updated = service.update_username(id, "alicia").await.unwrap();

        assert_eq!(updated.email(), "alice@example.com");
        assert_eq!(updated.username(), "alicia");
        assert_eq!(updated.date_joined(), alice.date_joined());
        assert!(service.find_by_username("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_to_taken_username() {
        let service = create_service();
        register_alice(&service).await;
        let bob = service
            .register(make_request("bob", "b@x.com", "pw"))
            .await
            .unwrap();

        let err = service
            .update_username(bob.id().unwrap(), "alice")
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_jwt_flag() {
        let service = create_service();
        let id = register_alice(&service).await.id().unwrap();

        service.set_jwt_auth_active(id, true).await.unwrap();
        assert!(service.get(id).await.unwrap().is_jwt_auth_active());

        service.set_jwt_auth_active(id, false).await.unwrap();
        assert!(!service.get(id).await.unwrap().is_jwt_auth_active());
    }

    #[tokio::test]
    async fn test_admin_role_scenario() {
        let service = create_service();
        let id = register_alice(&service).await.id().unwrap();

        service.create_role("Admin", "admin").await.unwrap();
        assert!(service.assign_role(id, "admin").await.unwrap());

        let dict = service.user_dict(id).await.unwrap();
        assert_eq!(dict.roles.len(), 1);
        assert_eq!(dict.roles[0].name(), "Admin");
        assert_eq!(dict.roles[0].slug(), "admin");

        let json = serde_json::to_value(&dict).unwrap();
        assert_eq!(json["_id"], serde_json::json!(id.value()));
        assert_eq!(json["roles"][0]["slug"], "admin");
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_role_slug() {
        let service = create_service();

        service.create_role("Admin", "admin").await.unwrap();
        let err = service.create_role("Administrators", "admin").await.unwrap_err();

        assert!(err.is_constraint_violation());
    }

    #[tokio::test]
    async fn test_assign_and_revoke() {
        let service = create_service();
        let id = register_alice(&service).await.id().unwrap();
        service.create_role("Admin", "admin").await.unwrap();

        assert!(service.assign_role(id, "admin").await.unwrap());
        assert!(!service.assign_role(id, "admin").await.unwrap());
        assert_eq!(service.users_with_role("admin").await.unwrap().len(), 1);

        assert!(service.revoke_role(id, "admin").await.unwrap());
        assert!(!service.revoke_role(id, "admin").await.unwrap());
        assert!(service.roles_for(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assign_unknown_role_or_user() {
        let service = create_service();
        let id = register_alice(&service).await.id().unwrap();
        service.create_role("Admin", "admin").await.unwrap();

        assert!(service.assign_role(id, "ghost").await.unwrap_err().is_not_found());
        assert!(service
            .assign_role(UserId::new(404), "admin")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_set_roles() {
        let service = create_service();
        let id = register_alice(&service).await.id().unwrap();
        for slug in ["admin", "editor", "viewer"] {
            service.create_role(&slug.to_uppercase(), slug).await.unwrap();
        }
        service.assign_role(id, "admin").await.unwrap();

        let roles = service
            .set_roles(id, &["editor".to_string(), "viewer".to_string()])
            .await
            .unwrap();
        let slugs: Vec<&str> = roles.iter().map(|r| r.slug()).collect();
        assert_eq!(slugs, vec!["editor", "viewer"]);

        let err = service
            .set_roles(id, &["missing".to_string()])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(service.roles_for(id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_storage_unavailable_propagates() {
        let users = Arc::new(MockUserRepository::new());
        let roles = Arc::new(InMemoryRoleRepository::new());
        let repos = AccountRepositories {
            users: users.clone(),
            roles: roles.clone(),
            user_roles: Arc::new(InMemoryUserRoleRepository::new(users.clone(), roles)),
        };
        let service = AccountService::new(repos, hasher());

        register_alice(&service).await;
        users.set_unavailable(true).await;

        let err = service.authenticate("alice", "s3cret").await.unwrap_err();
        assert!(err.is_retryable());

        let err = service
            .register(make_request("bob", "b@x.com", "pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::StorageUnavailable { .. }));
    }
}
