use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::permissions;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;
use crate::user::roles::Role;

/// Domain service implementation for user lifecycle operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    /// Load the target of an operation.
    ///
    /// A missing target is reported as `NotFound` only to admins and
    /// superadmins; everyone else gets `Forbidden` so that record existence
    /// does not leak.
    async fn fetch_or_authorize(&self, id: &UserId, actor: &User) -> Result<User, UserError> {
        match self.repository.find_by_id(id).await? {
            Some(user) => Ok(user),
            None if actor.roles.is_privileged() => Err(UserError::NotFound(id.to_string())),
            None => {
                tracing::warn!(actor_id = %actor.id, target_id = %id, "Access denied");
                Err(UserError::Forbidden)
            }
        }
    }

    fn authorize(actor: &User, target: &User) -> Result<(), UserError> {
        permissions::ensure_can_act_on(actor, target).inspect_err(|_| {
            tracing::warn!(actor_id = %actor.id, target_id = %target.id, "Access denied");
        })
    }

    /// Shared prologue of promote and demote.
    async fn privilege_target(&self, id: &UserId, actor: &User) -> Result<User, UserError> {
        permissions::ensure_superadmin(actor).inspect_err(|_| {
            tracing::warn!(actor_id = %actor.id, "Privilege management denied");
        })?;
        if actor.id == *id {
            return Err(UserError::SelfPrivilegeManagement);
        }
        let target = self.fetch_or_authorize(id, actor).await?;
        Self::authorize(actor, &target)?;
        Ok(target)
    }

    /// Error for a conditional write on `target` that matched no row.
    ///
    /// Roles changed since the permission check are checked again, so a
    /// concurrent promotion of the target surfaces as `Forbidden`.
    async fn unmatched(&self, target: &User, actor: &User) -> UserError {
        match self.repository.find_by_id(&target.id).await {
            Ok(Some(current)) if current.roles != target.roles => {
                match Self::authorize(actor, &current) {
                    Err(e) => e,
                    Ok(()) => UserError::NotFound(target.id.to_string()),
                }
            }
            Ok(_) => UserError::NotFound(target.id.to_string()),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: CreateUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.password_hasher.hash(command.password.expose())?;

        let user = User::register(
            command.name,
            command.surname,
            command.email,
            password_hash,
            CreateUserCommand::default_roles(),
        );

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId, actor: &User) -> Result<User, UserError> {
        let target = self.fetch_or_authorize(id, actor).await?;
        Self::authorize(actor, &target)?;
        Ok(target)
    }

    async fn update_user(
        &self,
        id: &UserId,
        actor: &User,
        command: UpdateUserCommand,
    ) -> Result<UserId, UserError> {
        let target = self.fetch_or_authorize(id, actor).await?;
        Self::authorize(actor, &target)?;

        // The acting user confirms with its own password, even when editing someone else.
        if !self
            .password_hasher
            .verify(&command.old_password, &actor.password_hash)
        {
            return Err(UserError::Unauthorized("Incorrect old password".to_string()));
        }

        if command.is_empty() {
            return Err(UserError::EmptyUpdate);
        }

        let password_hash = command
            .new_password
            .as_ref()
            .map(|password| self.password_hasher.hash(password.expose()))
            .transpose()?;

        let changes = UserChanges {
            name: command.name,
            surname: command.surname,
            email: command.email,
            password_hash,
        };

        let Some(updated_id) = self
            .repository
            .update_fields(&target.id, changes, true, target.roles)
            .await?
        else {
            return Err(self.unmatched(&target, actor).await);
        };

        tracing::info!(user_id = %updated_id, actor_id = %actor.id, "User updated");
        Ok(updated_id)
    }

    async fn delete_user(&self, id: &UserId, actor: &User) -> Result<UserId, UserError> {
        let target = self.fetch_or_authorize(id, actor).await?;

        if target.id == actor.id && target.roles.is_superadmin() {
            return Err(UserError::NotAcceptable(
                "Superadmin cannot be deleted".to_string(),
            ));
        }
        Self::authorize(actor, &target)?;

        let Some(deleted_id) = self
            .repository
            .set_active(&target.id, false, true, target.roles)
            .await?
        else {
            return Err(self.unmatched(&target, actor).await);
        };

        tracing::info!(user_id = %deleted_id, actor_id = %actor.id, "User deactivated");
        Ok(deleted_id)
    }

    async fn activate_user(&self, id: &UserId, actor: &User) -> Result<UserId, UserError> {
        let target = self.fetch_or_authorize(id, actor).await?;
        Self::authorize(actor, &target)?;

        let Some(activated_id) = self
            .repository
            .set_active(&target.id, true, false, target.roles)
            .await?
        else {
            return Err(self.unmatched(&target, actor).await);
        };

        tracing::info!(user_id = %activated_id, actor_id = %actor.id, "User activated");
        Ok(activated_id)
    }

    async fn promote_user(&self, id: &UserId, actor: &User) -> Result<UserId, UserError> {
        let target = self.privilege_target(id, actor).await?;

        if target.roles.is_privileged() {
            return Err(UserError::AlreadyPrivileged(target.email.to_string()));
        }

        let promoted_id = self
            .repository
            .update_roles(&target.id, target.roles.with(Role::Admin), target.roles)
            .await?
            .ok_or_else(|| UserError::AlreadyPrivileged(target.email.to_string()))?;

        tracing::info!(user_id = %promoted_id, actor_id = %actor.id, "Admin privilege granted");
        Ok(promoted_id)
    }

    async fn demote_user(&self, id: &UserId, actor: &User) -> Result<UserId, UserError> {
        let target = self.privilege_target(id, actor).await?;

        if !target.roles.is_admin() {
            return Err(UserError::NotPrivileged(target.email.to_string()));
        }

        let demoted_id = self
            .repository
            .update_roles(&target.id, target.roles.without(Role::Admin), target.roles)
            .await?
            .ok_or_else(|| UserError::NotPrivileged(target.email.to_string()))?;

        tracing::info!(user_id = %demoted_id, actor_id = %actor.id, "Admin privilege revoked");
        Ok(demoted_id)
    }
}
