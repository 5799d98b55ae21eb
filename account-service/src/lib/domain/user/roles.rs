use std::fmt;
use std::str::FromStr;

use crate::user::errors::RoleError;

/// Privilege tag held by a user.
///
/// `Admin` and `Superadmin` are layered on top of the base `User` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Admin,
    Superadmin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::User, Role::Admin, Role::Superadmin];

    /// Tag as stored and as carried in access tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Role::User => 0b001,
            Role::Admin => 0b010,
            Role::Superadmin => 0b100,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| RoleError::UnknownTag(s.to_string()))
    }
}

/// Set of role tags, stored as a bitset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn of(role: Role) -> Self {
        Self(role.bit())
    }

    pub fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_admin(self) -> bool {
        self.contains(Role::Admin)
    }

    pub fn is_superadmin(self) -> bool {
        self.contains(Role::Superadmin)
    }

    /// Holds `admin` or `superadmin`.
    pub fn is_privileged(self) -> bool {
        self.is_admin() || self.is_superadmin()
    }

    pub fn with(self, role: Role) -> Self {
        Self(self.0 | role.bit())
    }

    pub fn without(self, role: Role) -> Self {
        Self(self.0 & !role.bit())
    }

    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }

    /// Tags in canonical order (`user`, `admin`, `superadmin`).
    pub fn to_tags(self) -> Vec<String> {
        self.iter().map(|role| role.as_str().to_string()).collect()
    }

    /// Parse stored tags. Repeated tags collapse; unknown tags are rejected.
    pub fn from_tags<I, S>(tags: I) -> Result<Self, RoleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tags.into_iter()
            .map(|tag| tag.as_ref().parse::<Role>())
            .collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        iter.into_iter().fold(RoleSet::empty(), RoleSet::with)
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
