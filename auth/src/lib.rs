//! Authentication utilities library
//!
//! Provides the credential and token machinery used by the account service:
//! - Password hashing (Argon2id)
//! - Access/refresh token issuance and validation, one secret per class
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("Abcd12!@").unwrap();
//! assert!(hasher.verify("Abcd12!@", &hash));
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{Claims, TokenClass, TokenService, TokenSettings};
//! use chrono::Duration;
//!
//! let tokens = TokenService::new(&TokenSettings {
//!     access_secret: "access_secret_at_least_32_bytes_long!".to_string(),
//!     refresh_secret: "refresh_secret_at_least_32_bytes_long".to_string(),
//!     algorithm: "HS256".to_string(),
//!     access_ttl: Duration::minutes(30),
//!     refresh_ttl: Duration::days(7),
//! })
//! .unwrap();
//!
//! let token = tokens
//!     .issue(Claims::new().with_subject("alice@example.com"), TokenClass::Access, None)
//!     .unwrap();
//! let claims = tokens.validate(&token, TokenClass::Access).unwrap();
//! assert_eq!(claims.sub.as_deref(), Some("alice@example.com"));
//! assert!(tokens.validate(&token, TokenClass::Refresh).is_err());
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use jwt::Claims;
pub use jwt::Clock;
pub use jwt::FixedClock;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::SystemClock;
pub use jwt::TokenClass;
pub use jwt::TokenService;
pub use jwt::TokenSettings;
pub use password::PasswordError;
pub use password::PasswordHasher;
