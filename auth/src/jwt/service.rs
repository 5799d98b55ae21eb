use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use super::claims::Claims;
use super::clock::Clock;
use super::clock::SystemClock;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// The two kinds of token issued by [`TokenService`].
///
/// Each class is signed with its own secret, so a token of one class never
/// validates as the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Access,
    Refresh,
}

impl fmt::Display for TokenClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenClass::Access => f.write_str("access"),
            TokenClass::Refresh => f.write_str("refresh"),
        }
    }
}

/// Signing material and lifetimes for both token classes.
#[derive(Clone)]
pub struct TokenSettings {
    pub access_secret: String,
    pub refresh_secret: String,
    pub algorithm: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Issues and validates expiring tokens for the access and refresh classes.
pub struct TokenService {
    access: JwtHandler,
    refresh: JwtHandler,
    access_ttl: Duration,
    refresh_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    /// Build a token service driven by the wall clock.
    ///
    /// # Errors
    /// * `InvalidConfiguration` - Empty or shared secrets, non-HMAC algorithm,
    ///   or a non-positive lifetime
    pub fn new(settings: &TokenSettings) -> Result<Self, JwtError> {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Build a token service driven by the given clock.
    pub fn with_clock(settings: &TokenSettings, clock: Arc<dyn Clock>) -> Result<Self, JwtError> {
        if settings.access_secret == settings.refresh_secret {
            return Err(JwtError::InvalidConfiguration(
                "access and refresh tokens must use different secrets".to_string(),
            ));
        }
        if settings.access_ttl <= Duration::zero() || settings.refresh_ttl <= Duration::zero() {
            return Err(JwtError::InvalidConfiguration(
                "token lifetimes must be positive".to_string(),
            ));
        }

        Ok(Self {
            access: JwtHandler::with_algorithm(
                settings.access_secret.as_bytes(),
                &settings.algorithm,
            )?,
            refresh: JwtHandler::with_algorithm(
                settings.refresh_secret.as_bytes(),
                &settings.algorithm,
            )?,
            access_ttl: settings.access_ttl,
            refresh_ttl: settings.refresh_ttl,
            clock,
        })
    }

    /// Default lifetime of a token class.
    pub fn ttl(&self, class: TokenClass) -> Duration {
        match class {
            TokenClass::Access => self.access_ttl,
            TokenClass::Refresh => self.refresh_ttl,
        }
    }

    fn handler(&self, class: TokenClass) -> &JwtHandler {
        match class {
            TokenClass::Access => &self.access,
            TokenClass::Refresh => &self.refresh,
        }
    }

    /// Sign `claims` as a token of `class`.
    ///
    /// The `exp` claim is set to now plus `ttl_override`, or plus the class
    /// lifetime when no override is given. Any `exp` already present is replaced.
    pub fn issue(
        &self,
        claims: Claims,
        class: TokenClass,
        ttl_override: Option<Duration>,
    ) -> Result<String, JwtError> {
        let ttl = ttl_override.unwrap_or_else(|| self.ttl(class));
        let expires_at = self.clock.now() + ttl;
        let claims = claims.with_expiration(expires_at.timestamp());

        self.handler(class).encode(&claims)
    }

    /// Verify a token of `class` and return its claims.
    ///
    /// # Errors
    /// * `InvalidToken` - Bad signature (including a token of the other class),
    ///   malformed token, missing `exp`, or missing `sub`
    /// * `TokenExpired` - `exp` lies in the past
    pub fn validate(&self, token: &str, class: TokenClass) -> Result<Claims, JwtError> {
        let claims: Claims = self.handler(class).decode(token)?;

        if claims.exp.is_none() {
            return Err(JwtError::InvalidToken("missing 'exp' claim".to_string()));
        }
        if claims.is_expired(self.clock.now().timestamp()) {
            return Err(JwtError::TokenExpired);
        }
        if claims.sub.is_none() {
            return Err(JwtError::InvalidToken("missing 'sub' claim".to_string()));
        }

        Ok(claims)
    }
}
