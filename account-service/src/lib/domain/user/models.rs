use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;
use crate::user::roles::Role;
use crate::user::roles::RoleSet;

/// User aggregate entity.
///
/// Never physically removed by the service: `is_active` is the soft-delete flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: PersonName,
    pub surname: PersonName,
    pub email: EmailAddress,
    pub is_active: bool,
    pub password_hash: String,
    pub roles: RoleSet,
}

impl User {
    /// Build a freshly registered, active user.
    pub fn register(
        name: PersonName,
        surname: PersonName,
        email: EmailAddress,
        password_hash: String,
        roles: RoleSet,
    ) -> Self {
        Self {
            id: UserId::new(),
            name,
            surname,
            email,
            is_active: true,
            password_hash,
            roles,
        }
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Given name or surname.
///
/// Letters of any alphabet and hyphens only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name.
    ///
    /// # Arguments
    /// * `field` - Field label used in error messages ("Name", "Surname")
    /// * `value` - Raw value
    ///
    /// # Errors
    /// * `Empty` - Value is empty
    /// * `InvalidCharacters` - Contains something other than letters and `-`
    pub fn new(field: &'static str, value: String) -> Result<Self, NameError> {
        if value.is_empty() {
            return Err(NameError::Empty { field });
        }
        if !value.chars().all(|c| c.is_alphabetic() || c == '-') {
            return Err(NameError::InvalidCharacters { field });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that satisfies the password policy.
///
/// 8-16 characters with at least one uppercase letter, one lowercase letter,
/// one digit and one non-alphanumeric symbol. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 16;

    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if !(Self::MIN_LENGTH..=Self::MAX_LENGTH).contains(&length) {
            return Err(PasswordPolicyError::InvalidLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        let classes: [(&'static str, fn(char) -> bool); 4] = [
            ("an uppercase letter", char::is_uppercase),
            ("a lowercase letter", char::is_lowercase),
            ("a digit", |c| c.is_ascii_digit()),
            ("a special character", |c| !c.is_alphanumeric()),
        ];
        for (label, matches) in classes {
            if !password.chars().any(matches) {
                return Err(PasswordPolicyError::MissingCharacterClass(label));
            }
        }

        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Command to register a new user with domain types
#[derive(Debug)]
pub struct CreateUserCommand {
    pub name: PersonName,
    pub surname: PersonName,
    pub email: EmailAddress,
    pub password: Password,
}

impl CreateUserCommand {
    pub fn new(
        name: PersonName,
        surname: PersonName,
        email: EmailAddress,
        password: Password,
    ) -> Self {
        Self {
            name,
            surname,
            email,
            password,
        }
    }

    /// Roles granted at registration.
    pub fn default_roles() -> RoleSet {
        RoleSet::of(Role::User)
    }
}

/// Command to update an existing user.
///
/// `old_password` is the acting user's current password. All other fields
/// are optional; only provided fields are changed.
#[derive(Debug)]
pub struct UpdateUserCommand {
    pub old_password: String,
    pub name: Option<PersonName>,
    pub surname: Option<PersonName>,
    pub email: Option<EmailAddress>,
    pub new_password: Option<Password>,
}

impl UpdateUserCommand {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.surname.is_none()
            && self.email.is_none()
            && self.new_password.is_none()
    }
}

/// Column changes written by a field update. The password is already hashed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<PersonName>,
    pub surname: Option<PersonName>,
    pub email: Option<EmailAddress>,
    pub password_hash: Option<String>,
}
