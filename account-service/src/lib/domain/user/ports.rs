use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::roles::RoleSet;

/// Port for user lifecycle operations.
///
/// Every operation except registration takes the acting user and enforces
/// the permission rules itself.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user with the default `user` role.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StorageUnavailable` - Database operation failed
    async fn register(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Read a user the actor is allowed to see.
    ///
    /// # Errors
    /// * `NotFound` - Target does not exist (privileged actors only)
    /// * `Forbidden` - Actor may not act on target, or target is hidden
    async fn get_user(&self, id: &UserId, actor: &User) -> Result<User, UserError>;

    /// Update name, surname, email and/or password of a user.
    ///
    /// `command.old_password` must match the actor's own password.
    ///
    /// # Errors
    /// * `Forbidden` / `NotFound` - As for `get_user`
    /// * `Unauthorized` - Old password does not match the actor's password
    /// * `EmptyUpdate` - No field to change was supplied
    /// * `EmailAlreadyExists` - New email is taken
    async fn update_user(
        &self,
        id: &UserId,
        actor: &User,
        command: UpdateUserCommand,
    ) -> Result<UserId, UserError>;

    /// Soft-delete a user.
    ///
    /// # Errors
    /// * `Forbidden` / `NotFound` - As for `get_user`
    /// * `NotAcceptable` - A superadmin tried to delete itself
    /// * `NotFound` - User is already inactive
    async fn delete_user(&self, id: &UserId, actor: &User) -> Result<UserId, UserError>;

    /// Reactivate a soft-deleted user.
    ///
    /// # Errors
    /// * `Forbidden` / `NotFound` - As for `get_user`
    /// * `NotFound` - User is already active
    async fn activate_user(&self, id: &UserId, actor: &User) -> Result<UserId, UserError>;

    /// Grant the admin tag. Superadmin only.
    ///
    /// # Errors
    /// * `Forbidden` - Actor is not a superadmin
    /// * `SelfPrivilegeManagement` - Actor targeted itself
    /// * `AlreadyPrivileged` - Target already holds admin or superadmin
    async fn promote_user(&self, id: &UserId, actor: &User) -> Result<UserId, UserError>;

    /// Revoke the admin tag. Superadmin only.
    ///
    /// # Errors
    /// * `Forbidden` - Actor is not a superadmin
    /// * `SelfPrivilegeManagement` - Actor targeted itself
    /// * `NotPrivileged` - Target does not hold admin
    async fn demote_user(&self, id: &UserId, actor: &User) -> Result<UserId, UserError>;
}

/// Persistence operations for user aggregate.
///
/// Conditional writes report "no row matched" as `Ok(None)`, never as an error.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StorageUnavailable` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Set `is_active` to `active` if it currently equals `expected_active`
    /// and the stored roles still equal `expected_roles`.
    ///
    /// # Returns
    /// The user ID if a row was changed, `None` otherwise
    async fn set_active(
        &self,
        id: &UserId,
        active: bool,
        expected_active: bool,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError>;

    /// Write the given column changes under the same preconditions as `set_active`.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - New email is already registered
    async fn update_fields(
        &self,
        id: &UserId,
        changes: UserChanges,
        expected_active: bool,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError>;

    /// Replace the role set of a user if it still equals `expected_roles`.
    async fn update_roles(
        &self,
        id: &UserId,
        roles: RoleSet,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError>;

    /// Physically remove a user by email. Used only by operator tooling.
    async fn delete_by_email(&self, email: &EmailAddress) -> Result<Option<UserId>, UserError>;
}
