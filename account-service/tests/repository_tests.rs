mod common;

use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::PersonName;
use account_service::domain::user::models::UserChanges;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::roles::Role;
use account_service::domain::user::roles::RoleSet;
use account_service::outbound::repositories::PostgresUserRepository;
use account_service::domain::user::errors::UserError;
use common::new_user;
use common::TestDb;

#[tokio::test]
async fn test_create_and_find_user() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    let user = new_user("lol@kek.com", &[Role::User, Role::Admin]);
    user_repository
        .create(user.clone())
        .await
        .expect("Failed to create user");

    let by_id = user_repository
        .find_by_id(&user.id)
        .await
        .expect("Failed to get user")
        .expect("User not found");
    assert_eq!(by_id, user);
    assert!(by_id.roles.is_admin());

    let by_email = user_repository
        .find_by_email("lol@kek.com")
        .await
        .expect("Failed to get user")
        .expect("User not found");
    assert_eq!(by_email.id, user.id);

    assert!(user_repository
        .find_by_id(&UserId::new())
        .await
        .expect("Failed to query user")
        .is_none());
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    user_repository
        .create(new_user("lol@kek.com", &[Role::User]))
        .await
        .expect("Failed to create user");

    let result = user_repository
        .create(new_user("lol@kek.com", &[Role::User]))
        .await;
    assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
}

#[tokio::test]
async fn test_set_active_is_conditional() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    let user = new_user("lol@kek.com", &[Role::User]);
    user_repository.create(user.clone()).await.unwrap();

    let deactivated = user_repository
        .set_active(&user.id, false, true, user.roles)
        .await
        .unwrap();
    assert_eq!(deactivated, Some(user.id));

    let again = user_repository
        .set_active(&user.id, false, true, user.roles)
        .await
        .unwrap();
    assert_eq!(again, None);

    let stored = user_repository.find_by_id(&user.id).await.unwrap().unwrap();
    assert!(!stored.is_active);

    // Stale role snapshot: the row no longer matches.
    let stale = user_repository
        .set_active(&user.id, true, false, RoleSet::of(Role::Admin))
        .await
        .unwrap();
    assert_eq!(stale, None);

    let activated = user_repository
        .set_active(&user.id, true, false, user.roles)
        .await
        .unwrap();
    assert_eq!(activated, Some(user.id));
}

#[tokio::test]
async fn test_concurrent_deletes_apply_once() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    let user = new_user("lol@kek.com", &[Role::User]);
    user_repository.create(user.clone()).await.unwrap();

    let (first, second) = tokio::join!(
        user_repository.set_active(&user.id, false, true, user.roles),
        user_repository.set_active(&user.id, false, true, user.roles),
    );

    let applied = [first.unwrap(), second.unwrap()]
        .into_iter()
        .filter(Option::is_some)
        .count();
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn test_update_fields_keeps_unset_columns() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    let user = new_user("lol@kek.com", &[Role::User]);
    user_repository.create(user.clone()).await.unwrap();

    let changes = UserChanges {
        name: Some(PersonName::new("Name", "Fedor".to_string()).unwrap()),
        ..UserChanges::default()
    };
    let updated = user_repository
        .update_fields(&user.id, changes, true, user.roles)
        .await
        .unwrap();
    assert_eq!(updated, Some(user.id));

    let stored = user_repository.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.name.as_str(), "Fedor");
    assert_eq!(stored.surname, user.surname);
    assert_eq!(stored.email, user.email);
    assert_eq!(stored.password_hash, user.password_hash);
}

#[tokio::test]
async fn test_update_fields_preconditions() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    let user = new_user("lol@kek.com", &[Role::User]);
    let other = new_user("kek@lol.com", &[Role::User]);
    user_repository.create(user.clone()).await.unwrap();
    user_repository.create(other.clone()).await.unwrap();

    let taken = UserChanges {
        email: Some(EmailAddress::new("kek@lol.com".to_string()).unwrap()),
        ..UserChanges::default()
    };
    let result = user_repository
        .update_fields(&user.id, taken, true, user.roles)
        .await;
    assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));

    user_repository
        .set_active(&user.id, false, true, user.roles)
        .await
        .unwrap();
    let rename = UserChanges {
        surname: Some(PersonName::new("Surname", "Petrov".to_string()).unwrap()),
        ..UserChanges::default()
    };
    let inactive = user_repository
        .update_fields(&user.id, rename, true, user.roles)
        .await
        .unwrap();
    assert_eq!(inactive, None);
}

#[tokio::test]
async fn test_update_roles_is_compare_and_set() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    let user = new_user("lol@kek.com", &[Role::User]);
    user_repository.create(user.clone()).await.unwrap();
    let promoted_roles = user.roles.with(Role::Admin);

    let (first, second) = tokio::join!(
        user_repository.update_roles(&user.id, promoted_roles, user.roles),
        user_repository.update_roles(&user.id, promoted_roles, user.roles),
    );
    let applied = [first.unwrap(), second.unwrap()]
        .into_iter()
        .filter(Option::is_some)
        .count();
    assert_eq!(applied, 1);

    let stored = user_repository.find_by_id(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.roles, promoted_roles);

    let demoted = user_repository
        .update_roles(&user.id, user.roles, promoted_roles)
        .await
        .unwrap();
    assert_eq!(demoted, Some(user.id));
}

#[tokio::test]
async fn test_delete_by_email() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    let user = new_user("lol@kek.com", &[Role::Superadmin]);
    user_repository.create(user.clone()).await.unwrap();

    let deleted = user_repository
        .delete_by_email(&user.email)
        .await
        .expect("Failed to delete user");
    assert_eq!(deleted, Some(user.id));

    assert!(user_repository
        .find_by_id(&user.id)
        .await
        .unwrap()
        .is_none());
    assert_eq!(
        user_repository.delete_by_email(&user.email).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_unknown_role_tag_is_storage_fault() {
    let Some(test_database) = TestDb::new().await else {
        return;
    };
    let user_repository = PostgresUserRepository::new(test_database.pg_pool.clone());

    let user = new_user("lol@kek.com", &[Role::User]);
    user_repository.create(user.clone()).await.unwrap();
    sqlx::query("UPDATE users SET roles = ARRAY['wizard'] WHERE user_id = $1")
        .bind(user.id.0)
        .execute(&test_database.pg_pool)
        .await
        .expect("Failed to corrupt roles");

    let result = user_repository.find_by_id(&user.id).await;
    assert!(matches!(result, Err(UserError::StorageUnavailable(_))));
}
