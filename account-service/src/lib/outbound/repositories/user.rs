use async_trait::async_trait;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserChanges;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;
use crate::user::roles::RoleSet;

const EMAIL_CONSTRAINT: &str = "users_email_key";

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    user_id: Uuid,
    name: String,
    surname: String,
    email: String,
    is_active: bool,
    hashed_password: String,
    roles: Vec<String>,
}

impl UserRow {
    fn into_user(self) -> Result<User, UserError> {
        let user_id = self.user_id;
        self.try_into_user().map_err(|e| {
            tracing::error!(user_id = %user_id, "Stored user row is invalid: {}", e);
            UserError::StorageUnavailable(format!("invalid user row {}: {}", user_id, e))
        })
    }

    fn try_into_user(self) -> Result<User, UserError> {
        Ok(User {
            id: UserId(self.user_id),
            name: PersonName::new("Name", self.name)?,
            surname: PersonName::new("Surname", self.surname)?,
            email: EmailAddress::new(self.email)?,
            is_active: self.is_active,
            password_hash: self.hashed_password,
            roles: RoleSet::from_tags(&self.roles)?,
        })
    }
}

fn storage_error(e: sqlx::Error) -> UserError {
    tracing::error!("Database operation failed: {}", e);
    UserError::StorageUnavailable(e.to_string())
}

/// Translate a failed write, turning the email uniqueness violation into a conflict.
fn write_error(e: sqlx::Error, email: Option<&EmailAddress>) -> UserError {
    if let (Some(db_err), Some(email)) = (e.as_database_error(), email) {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_CONSTRAINT) {
            return UserError::EmailAlreadyExists(email.to_string());
        }
    }
    storage_error(e)
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, surname, email, is_active, hashed_password, roles)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.name.as_str())
        .bind(user.surname.as_str())
        .bind(user.email.as_str())
        .bind(user.is_active)
        .bind(&user.password_hash)
        .bind(user.roles.to_tags())
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, Some(&user.email)))?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, name, surname, email, is_active, hashed_password, roles
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(UserRow::into_user)
        .transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT user_id, name, surname, email, is_active, hashed_password, roles
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?
        .map(UserRow::into_user)
        .transpose()
    }

    async fn set_active(
        &self,
        id: &UserId,
        active: bool,
        expected_active: bool,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users
            SET is_active = $2
            WHERE user_id = $1 AND is_active = $3 AND roles @> $4 AND roles <@ $4
            RETURNING user_id
            "#,
        )
        .bind(id.0)
        .bind(active)
        .bind(expected_active)
        .bind(expected_roles.to_tags())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(updated.map(UserId))
    }

    async fn update_fields(
        &self,
        id: &UserId,
        changes: UserChanges,
        expected_active: bool,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                surname = COALESCE($3, surname),
                email = COALESCE($4, email),
                hashed_password = COALESCE($5, hashed_password)
            WHERE user_id = $1 AND is_active = $6 AND roles @> $7 AND roles <@ $7
            RETURNING user_id
            "#,
        )
        .bind(id.0)
        .bind(changes.name.as_ref().map(PersonName::as_str))
        .bind(changes.surname.as_ref().map(PersonName::as_str))
        .bind(changes.email.as_ref().map(EmailAddress::as_str))
        .bind(changes.password_hash.as_deref())
        .bind(expected_active)
        .bind(expected_roles.to_tags())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, changes.email.as_ref()))?;

        Ok(updated.map(UserId))
    }

    async fn update_roles(
        &self,
        id: &UserId,
        roles: RoleSet,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError> {
        // Set comparison: tag order and duplicates in the stored array do not matter.
        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE users
            SET roles = $2
            WHERE user_id = $1 AND roles @> $3 AND roles <@ $3
            RETURNING user_id
            "#,
        )
        .bind(id.0)
        .bind(roles.to_tags())
        .bind(expected_roles.to_tags())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(updated.map(UserId))
    }

    async fn delete_by_email(&self, email: &EmailAddress) -> Result<Option<UserId>, UserError> {
        let deleted = sqlx::query_scalar::<_, Uuid>(
            r#"
            DELETE FROM users
            WHERE email = $1
            RETURNING user_id
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(deleted.map(UserId))
    }
}
