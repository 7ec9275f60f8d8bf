use std::sync::Arc;

use async_trait::async_trait;
use auth::TokenIssuer;
use auth::TokenPair;
use chrono::Utc;

use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AccountError;
use crate::user::ports::AccountServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for account operations.
///
/// Orchestrates the repository, the password hasher, and the token
/// issuer. Holds no session state of its own; everything lives in the
/// store, so the service is safe to replicate.
pub struct AccountService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    token_issuer: Arc<TokenIssuer>,
    password_hasher: auth::PasswordHasher,
}

impl<R> AccountService<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>, token_issuer: Arc<TokenIssuer>) -> Self {
        Self {
            repository,
            token_issuer,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Issue a fresh pair and overwrite the stored refresh token.
    async fn issue_and_rotate(&self, user: &User) -> Result<TokenPair, AccountError> {
        let pair = self
            .token_issuer
            .issue_pair(user.id, user.email.as_str())?;

        self.repository
            .set_refresh_token(&user.id, &pair.refresh_token)
            .await?;

        Ok(pair)
    }
}

#[async_trait]
impl<R> AccountServicePort for AccountService<R>
where
    R: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AccountError> {
        if let Some(existing) = self.repository.find_by_email(command.email.as_str()).await? {
            return Err(AccountError::EmailAlreadyExists(
                existing.email.as_str().to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            refresh_token: None,
            created_at: Utc::now(),
        };

        self.repository.create(user).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AccountError> {
        // Unknown email and bad password collapse into one error so the
        // response does not reveal which accounts exist.
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let is_valid = self
            .password_hasher
            .verify(password, &user.password_hash)?;
        if !is_valid {
            return Err(AccountError::InvalidCredentials);
        }

        self.issue_and_rotate(&user).await
    }

    async fn refresh(&self, token: &str) -> Result<TokenPair, AccountError> {
        let claims = self.token_issuer.verify_refresh(token).map_err(|e| {
            tracing::warn!(error = %e, "Refresh token failed verification");
            AccountError::RefreshNotCurrent
        })?;

        let user_id =
            UserId::from_string(&claims.sub).map_err(|_| AccountError::RefreshNotCurrent)?;

        let user = self
            .repository
            .find_by_id(&user_id)
            .await?
            .ok_or(AccountError::RefreshNotCurrent)?;

        // A verified token that is not the stored one has been superseded
        // by a later login or refresh.
        if user.refresh_token.as_deref() != Some(token) {
            return Err(AccountError::RefreshNotCurrent);
        }

        self.issue_and_rotate(&user).await
    }

    async fn logout(&self, id: &UserId) -> Result<(), AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))?;

        self.repository.clear_refresh_token(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, AccountError> {
        self.repository.list_all().await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, AccountError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))?;

        if let Some(new_name) = command.name {
            user.name = new_name;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        self.repository.update(user).await
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), AccountError> {
        self.repository.delete(id).await
    }
}
