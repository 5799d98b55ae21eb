use async_trait::async_trait;

use crate::domain::user::models::User;
use crate::user::errors::UserError;

/// Port for credential checks and token handling.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Exchange email and password for an access/refresh token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `TokenGeneration` - Tokens could not be signed
    async fn login(&self, email: &str, password: &str) -> Result<auth::TokenPair, UserError>;

    /// Mint a fresh access token from a refresh token.
    ///
    /// Roles are re-read from storage, never copied from the old token.
    ///
    /// # Errors
    /// * `InvalidToken` / `TokenExpired` - Refresh token is not valid
    /// * `NotFound` - Token subject no longer exists
    async fn refresh(&self, refresh_token: &str) -> Result<String, UserError>;

    /// Resolve the user behind an access token.
    ///
    /// # Errors
    /// * `Unauthorized` - Token is invalid or expired, or its user is gone
    async fn authenticate(&self, access_token: &str) -> Result<User, UserError>;

    /// Lifetime of refresh tokens, used for the refresh cookie.
    fn refresh_token_ttl(&self) -> chrono::Duration;
}
