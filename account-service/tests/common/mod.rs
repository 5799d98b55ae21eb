use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::authentication::service::AuthService;
use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::PersonName;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserChanges;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::roles::Role;
use account_service::domain::user::roles::RoleSet;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::user::errors::UserError;
use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenSettings;
use axum::body::Body;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use tower::ServiceExt;

pub const PASSWORD: &str = "Abcd12!@";

/// Repository keeping users in a map, with the same conditional-write
/// semantics as the PostgreSQL adapter.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }

    fn email_taken(users: &HashMap<UserId, User>, email: &EmailAddress, except: &UserId) -> bool {
        users
            .values()
            .any(|user| user.email == *email && user.id != *except)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.lock().unwrap();
        if Self::email_taken(&users, &user.email, &user.id) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.get(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn set_active(
        &self,
        id: &UserId,
        active: bool,
        expected_active: bool,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError> {
        let mut users = self.users.lock().unwrap();
        Ok(users
            .get_mut(id)
            .filter(|user| user.is_active == expected_active && user.roles == expected_roles)
            .map(|user| {
                user.is_active = active;
                user.id
            }))
    }

    async fn update_fields(
        &self,
        id: &UserId,
        changes: UserChanges,
        expected_active: bool,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError> {
        let mut users = self.users.lock().unwrap();
        if let Some(email) = &changes.email {
            if Self::email_taken(&users, email, id) {
                return Err(UserError::EmailAlreadyExists(email.to_string()));
            }
        }

        Ok(users
            .get_mut(id)
            .filter(|user| user.is_active == expected_active && user.roles == expected_roles)
            .map(|user| {
                if let Some(name) = changes.name {
                    user.name = name;
                }
                if let Some(surname) = changes.surname {
                    user.surname = surname;
                }
                if let Some(email) = changes.email {
                    user.email = email;
                }
                if let Some(password_hash) = changes.password_hash {
                    user.password_hash = password_hash;
                }
                user.id
            }))
    }

    async fn update_roles(
        &self,
        id: &UserId,
        roles: RoleSet,
        expected_roles: RoleSet,
    ) -> Result<Option<UserId>, UserError> {
        let mut users = self.users.lock().unwrap();
        Ok(users
            .get_mut(id)
            .filter(|user| user.roles == expected_roles)
            .map(|user| {
                user.roles = roles;
                user.id
            }))
    }

    async fn delete_by_email(&self, email: &EmailAddress) -> Result<Option<UserId>, UserError> {
        let mut users = self.users.lock().unwrap();
        let Some(id) = users
            .values()
            .find(|user| user.email == *email)
            .map(|user| user.id)
        else {
            return Ok(None);
        };
        Ok(users.remove(&id).map(|user| user.id))
    }
}

/// Response captured from the router
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: serde_json::Value,
}

/// Test application driving the router in-process
pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryUserRepository>,
}

/// Seeded account with a live access token
pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn spawn() -> Self {
        let repository = Arc::new(InMemoryUserRepository::default());

        let authenticator = Arc::new(
            Authenticator::new(&TokenSettings {
                access_secret: "test-access-secret-for-jwt-signing-32-bytes".to_string(),
                refresh_secret: "test-refresh-secret-for-jwt-signing-32-bytes".to_string(),
                algorithm: "HS256".to_string(),
                access_ttl: chrono::Duration::minutes(30),
                refresh_ttl: chrono::Duration::days(7),
            })
            .expect("Failed to build authenticator"),
        );

        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));
        let auth_service = Arc::new(AuthService::new(Arc::clone(&repository), authenticator));

        Self {
            router: create_router(user_service, auth_service, false),
            repository,
        }
    }

    /// Send a request through the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Send a JSON request, with an optional bearer token
    pub async fn json(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/v1/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(
                serde_urlencoded::to_string([("username", email), ("password", password)])
                    .expect("Failed to encode login form"),
            ))
            .expect("Failed to build request");

        self.send(request).await
    }

    pub async fn refresh(&self, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri("/v1/login/token");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.send(builder.body(Body::empty()).expect("Failed to build request"))
            .await
    }

    /// Store a user with the given roles and log it in
    pub async fn seed(&self, roles: &[Role]) -> TestUser {
        let email = format!("{}@kek.com", uuid::Uuid::new_v4().simple());
        let user = new_user(&email, roles);
        let id = user.id;
        self.repository.create(user).await.unwrap();

        let response = self.login(&email, PASSWORD).await;
        assert_eq!(response.status, StatusCode::OK);
        let token = response.body["data"]["access_token"]
            .as_str()
            .expect("access token in login response")
            .to_string();

        TestUser { id, email, token }
    }
}

/// `name=value` pair of the refresh cookie from a `Set-Cookie` header
pub fn refresh_cookie(response: &TestResponse) -> Option<String> {
    response
        .headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("refresh_token="))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

/// Throwaway PostgreSQL database with migrations applied.
///
/// Needs `DATABASE_URL` pointing at a server where the user may create
/// databases; without it `new` returns `None` and the caller skips.
pub struct TestDb {
    pub pg_pool: PgPool,
    pub pg_db_name: String,
    postgres_url: String,
}

impl TestDb {
    pub async fn new() -> Option<Self> {
        let Ok(postgres_url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL is not set, skipping PostgreSQL test");
            return None;
        };
        let pg_db_name = format!(
            "test_accounts_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, pg_db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = postgres_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&pg_db_name);
        let pg_pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pg_pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pg_pool,
            pg_db_name,
            postgres_url,
        })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let pg_db_name = self.pg_db_name.clone();
        let postgres_url = self.postgres_url.clone();

        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&postgres_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            pg_db_name
                        )
                        .as_str(),
                    )
                    .await;
                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, pg_db_name).as_str())
                    .await;
            }
        });
    }
}

/// Registered-looking user with the shared test password.
pub fn new_user(email: &str, roles: &[Role]) -> User {
    User::register(
        PersonName::new("Name", "Nikolai".to_string()).unwrap(),
        PersonName::new("Surname", "Sviridov".to_string()).unwrap(),
        EmailAddress::new(email.to_string()).unwrap(),
        auth::PasswordHasher::new().hash(PASSWORD).unwrap(),
        roles.iter().copied().collect(),
    )
}
