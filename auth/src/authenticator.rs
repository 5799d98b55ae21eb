use std::sync::Arc;

use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::Clock;
use crate::jwt::JwtError;
use crate::jwt::TokenClass;
use crate::jwt::TokenService;
use crate::jwt::TokenSettings;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    tokens: TokenService,
}

/// Tokens handed out on successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived token for API calls
    pub access_token: String,
    /// Long-lived token used only to mint new access tokens
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator driven by the wall clock.
    ///
    /// # Errors
    /// * `JwtError::InvalidConfiguration` - Token settings are unusable
    pub fn new(settings: &TokenSettings) -> Result<Self, JwtError> {
        Ok(Self::from_token_service(TokenService::new(settings)?))
    }

    /// Create a new authenticator driven by the given clock.
    pub fn with_clock(settings: &TokenSettings, clock: Arc<dyn Clock>) -> Result<Self, JwtError> {
        Ok(Self::from_token_service(TokenService::with_clock(
            settings, clock,
        )?))
    }

    pub fn from_token_service(tokens: TokenService) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            tokens,
        }
    }

    /// Verify credentials and issue an access/refresh token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `access_claims` - Payload of the access token
    /// * `refresh_claims` - Payload of the refresh token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        access_claims: Claims,
        refresh_claims: Claims,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(TokenPair {
            access_token: self.tokens.issue(access_claims, TokenClass::Access, None)?,
            refresh_token: self
                .tokens
                .issue(refresh_claims, TokenClass::Refresh, None)?,
        })
    }

    /// Spend one password verification for a login whose user does not exist.
    pub fn reject_unknown_user(&self, password: &str) {
        self.password_hasher.verify_decoy(password);
    }

    /// Issue a token without password verification.
    ///
    /// Used by the refresh flow, where the caller already proved identity
    /// with a valid refresh token.
    pub fn generate_token(&self, claims: Claims, class: TokenClass) -> Result<String, JwtError> {
        self.tokens.issue(claims, class, None)
    }

    /// Validate a token of the given class and return its claims.
    pub fn validate_token(&self, token: &str, class: TokenClass) -> Result<Claims, JwtError> {
        self.tokens.validate(token, class)
    }

    /// Default lifetime of a token class.
    pub fn token_ttl(&self, class: TokenClass) -> Duration {
        self.tokens.ttl(class)
    }
}
