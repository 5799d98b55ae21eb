use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for name and surname validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} should contain only letters and hyphens")]
    InvalidCharacters { field: &'static str },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password must be {min}-{max} characters long, got {actual}")]
    InvalidLength {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Password must contain {0}")]
    MissingCharacterClass(&'static str),
}

/// Error for role tag parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role tag: {0}")]
    UnknownTag(String),
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    #[error("At least one parameter for user update info should be provided")]
    EmptyUpdate,

    // Authentication errors
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials: {0}")]
    InvalidToken(String),

    #[error("Could not validate credentials: token expired")]
    TokenExpired,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Authorization errors
    #[error("Forbidden")]
    Forbidden,

    #[error("Not acceptable: {0}")]
    NotAcceptable(String),

    #[error("Cannot manage privileges of itself")]
    SelfPrivilegeManagement,

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User with email {0} already exists")]
    EmailAlreadyExists(String),

    #[error("User with email {0} already promoted to admin / superadmin")]
    AlreadyPrivileged(String),

    #[error("User with email {0} has no admin privileges")]
    NotPrivileged(String),

    // Infrastructure errors
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token generation failed: {0}")]
    TokenGeneration(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}

impl From<auth::PasswordError> for UserError {
    fn from(err: auth::PasswordError) -> Self {
        UserError::Hashing(err.to_string())
    }
}

impl From<auth::JwtError> for UserError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::TokenExpired => UserError::TokenExpired,
            auth::JwtError::InvalidToken(msg) => UserError::InvalidToken(msg),
            auth::JwtError::EncodingFailed(msg) | auth::JwtError::InvalidConfiguration(msg) => {
                UserError::TokenGeneration(msg)
            }
        }
    }
}
