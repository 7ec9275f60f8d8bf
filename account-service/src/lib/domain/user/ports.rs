use async_trait::async_trait;
use auth::TokenPair;

use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::AccountError;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new user with a hashed password and no live session.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, AccountError>;

    /// Verify credentials, issue a fresh token pair, and rotate the
    /// stored refresh token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email unknown or password mismatch
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AccountError>;

    /// Exchange a current refresh token for a fresh pair, rotating the
    /// stored token. A structurally valid token that is not the stored
    /// current one is rejected - that is how reuse of a superseded token
    /// is detected.
    ///
    /// # Errors
    /// * `RefreshNotCurrent` - Token invalid, expired, unknown user, or superseded
    /// * `DatabaseError` - Database operation failed
    async fn refresh(&self, token: &str) -> Result<TokenPair, AccountError>;

    /// Clear the stored refresh token, ending the user's session.
    ///
    /// Clearing an already-empty slot is a no-op. Already-issued access
    /// tokens stay valid until they expire.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn logout(&self, id: &UserId) -> Result<(), AccountError>;

    /// Retrieve all users.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_users(&self) -> Result<Vec<User>, AccountError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, AccountError>;

    /// Update existing user with optional fields.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, AccountError>;

    /// Delete existing user.
    ///
    /// Outstanding tokens for the deleted id are not touched; any
    /// unexpired access token keeps passing the gate until it expires.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, id: &UserId) -> Result<(), AccountError>;
}

/// Persistence operations for user records.
///
/// The store is the only session state: the one-refresh-token-per-user
/// invariant rests on each of these updates being a single atomic write
/// per record. Concurrent rotations for the same user are last-write-wins.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, AccountError>;

    /// Retrieve user by identifier (None if not found).
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError>;

    /// Retrieve user by email address (None if not found).
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError>;

    /// Retrieve all users.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, AccountError>;

    /// Update name/email/password fields of an existing user.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, AccountError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, id: &UserId) -> Result<(), AccountError>;

    /// Unconditionally overwrite the stored refresh token (rotation).
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn set_refresh_token(&self, id: &UserId, token: &str) -> Result<(), AccountError>;

    /// Clear the stored refresh token (logout/revoke).
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn clear_refresh_token(&self, id: &UserId) -> Result<(), AccountError>;
}
