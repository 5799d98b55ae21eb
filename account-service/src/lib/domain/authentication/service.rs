use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Claims;
use auth::TokenClass;
use auth::TokenPair;

use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;

const USER_ID_CLAIM: &str = "user_id";
const ROLES_CLAIM: &str = "roles";

/// Authentication flow over a user repository.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Access token payload: email as subject, plus id and current roles.
    fn access_claims(user: &User) -> Claims {
        Claims::new()
            .with_subject(user.email.as_str())
            .with_extra(USER_ID_CLAIM, user.id.to_string())
            .with_extra(ROLES_CLAIM, user.roles.to_tags())
    }

    fn refresh_claims(user: &User) -> Claims {
        Claims::new().with_subject(user.email.as_str())
    }

    fn subject(claims: &Claims) -> Result<&str, UserError> {
        claims
            .sub
            .as_deref()
            .ok_or_else(|| UserError::InvalidToken("missing subject".to_string()))
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, email: &str, password: &str) -> Result<TokenPair, UserError> {
        let Some(user) = self.repository.find_by_email(email).await? else {
            self.authenticator.reject_unknown_user(password);
            tracing::warn!(email = %email, "Login failed");
            return Err(UserError::InvalidCredentials);
        };

        let pair = self
            .authenticator
            .authenticate(
                password,
                &user.password_hash,
                Self::access_claims(&user),
                Self::refresh_claims(&user),
            )
            .map_err(|e| match e {
                auth::AuthenticationError::InvalidCredentials => {
                    tracing::warn!(email = %email, "Login failed");
                    UserError::InvalidCredentials
                }
                auth::AuthenticationError::JwtError(e) => UserError::from(e),
            })?;

        tracing::info!(user_id = %user.id, "User logged in");
        Ok(pair)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, UserError> {
        let claims = self
            .authenticator
            .validate_token(refresh_token, TokenClass::Refresh)?;
        let email = Self::subject(&claims)?;

        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        let access_token = self
            .authenticator
            .generate_token(Self::access_claims(&user), TokenClass::Access)?;

        tracing::debug!(user_id = %user.id, "Access token refreshed");
        Ok(access_token)
    }

    async fn authenticate(&self, access_token: &str) -> Result<User, UserError> {
        let claims = self
            .authenticator
            .validate_token(access_token, TokenClass::Access)
            .map_err(|e| {
                tracing::warn!("Access token rejected: {}", e);
                UserError::Unauthorized(e.to_string())
            })?;
        let email =
            Self::subject(&claims).map_err(|e| UserError::Unauthorized(e.to_string()))?;

        self.repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::Unauthorized("unknown token subject".to_string()))
    }

    fn refresh_token_ttl(&self) -> chrono::Duration {
        self.authenticator.token_ttl(TokenClass::Refresh)
    }
}
