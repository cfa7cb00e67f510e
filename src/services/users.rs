//! Authentication and roster management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::{AuthConfig, BootstrapConfig},
    error::{AppError, AppResult},
    models::user::{MemberSummary, Role, UpdateMember, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user by email and return a JWT token
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication(
                "Invalid email or password".to_string(),
            ));
        }

        let claims = UserClaims::new(&user, self.config.jwt_expiration_hours);
        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Register a new member. Signup never creates librarians.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> AppResult<User> {
        if self.repository.users.email_exists(email, None).await? {
            return Err(AppError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }

        let password_hash = self.hash_password(password)?;
        self.repository
            .users
            .create(name, email, &password_hash, Role::Member)
            .await
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// List all members
    pub async fn list_members(&self) -> AppResult<Vec<MemberSummary>> {
        self.repository.users.list_members().await
    }

    /// Update a member's profile fields
    pub async fn update_member(&self, id: i32, update: UpdateMember) -> AppResult<User> {
        // Resolve the member first so an unknown id is a 404, not a
        // conflict on someone else's email.
        self.repository.users.get_member(id).await?;

        if let Some(ref email) = update.email {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(
                    "User already exists with this email".to_string(),
                ));
            }
        }

        self.repository.users.update_member(id, &update).await
    }

    /// Delete a member and, by cascade, their transactions
    pub async fn delete_member(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete_member(id).await
    }

    /// Create the configured librarian account when no user holds its
    /// email yet. Runs once at startup.
    pub async fn ensure_bootstrap_librarian(&self, bootstrap: &BootstrapConfig) -> AppResult<()> {
        if self
            .repository
            .users
            .email_exists(&bootstrap.email, None)
            .await?
        {
            tracing::debug!("Bootstrap librarian already exists, skipping");
            return Ok(());
        }

        let password_hash = self.hash_password(&bootstrap.password)?;
        let user = self
            .repository
            .users
            .create(
                &bootstrap.name,
                &bootstrap.email,
                &password_hash,
                Role::Librarian,
            )
            .await?;

        tracing::info!("Created bootstrap librarian account {}", user.email);
        Ok(())
    }

    /// Verify user password
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
