//! User accounts service: signup, login, password changes, promotion

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::user::{Caller, ChangePassword, Claims, Login, Role, Signup, User},
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

    /// Create a member account and log it in.
    pub async fn signup(&self, form: Signup) -> AppResult<(String, User)> {
        form.validate()?;

        let password_hash = self.hash_password(&form.password)?;
        let user = self
            .repository
            .users
            .create(&form.name, &form.email, &password_hash)
            .await?;

        tracing::info!(user_id = user.id, "account created");

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Authenticate by email and password, minting a bearer token.
    pub async fn login(&self, form: Login) -> AppResult<(String, User)> {
        form.validate()?;

        // Unknown email and wrong password fold into the same error.
        let user = self
            .repository
            .users
            .get_by_email(&form.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.verify_password(&user, &form.password)? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    /// Profile of the authenticated caller
    pub async fn me(&self, caller: &Caller) -> AppResult<User> {
        self.repository.users.get_by_id(caller.user_id).await
    }

    /// Change the caller's password, verifying the current one first.
    pub async fn change_password(&self, caller: &Caller, form: ChangePassword) -> AppResult<()> {
        form.validate()?;

        let user = self.repository.users.get_by_id(caller.user_id).await?;
        if !self.verify_password(&user, &form.current_password)? {
            return Err(AppError::Authentication(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = self.hash_password(&form.new_password)?;
        self.repository
            .users
            .update_password(caller.user_id, &password_hash)
            .await
    }

    /// Promote a member to librarian.
    pub async fn promote(&self, user_id: i32) -> AppResult<User> {
        let user = self.repository.users.get_by_id(user_id).await?;

        match user.role {
            Role::Member => {
                self.repository
                    .users
                    .set_role(user_id, Role::Librarian)
                    .await?;
                tracing::info!(user_id, "user promoted to librarian");
                self.repository.users.get_by_id(user_id).await
            }
            // Re-promoting a librarian changes nothing; not an error.
            Role::Librarian => Ok(user),
            Role::Admin => Err(AppError::Validation(
                "Administrators cannot be promoted to librarian".to_string(),
            )),
        }
    }

    /// All users, newest first (admin review)
    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Create the bootstrap administrator if it does not exist yet.
    pub async fn ensure_admin(&self, admin: &AdminConfig) -> AppResult<()> {
        if self
            .repository
            .users
            .get_by_email(&admin.email)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let password_hash = self.hash_password(&admin.password)?;
        let user = self
            .repository
            .users
            .create(&admin.name, &admin.email, &password_hash)
            .await?;
        self.repository.users.set_role(user.id, Role::Admin).await?;

        tracing::info!(user_id = user.id, "bootstrap administrator created");
        Ok(())
    }

    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = Claims {
            sub: user.email.clone(),
            user_id: user.id,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash a password using Argon2
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }
}
