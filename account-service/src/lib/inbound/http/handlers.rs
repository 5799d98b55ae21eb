use axum::http::header;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

pub mod activate_user;
pub mod admin_privilege;
pub mod create_user;
pub mod delete_user;
pub mod get_user;
pub mod login;
pub mod refresh_token;
pub mod update_user;

/// Message for every rejected bearer or refresh token.
pub const INVALID_TOKEN_MESSAGE: &str = "Could not validate credentials";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    NotAcceptable(String),
    ServiceUnavailable(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    Json(ApiResponseBody::new_error(StatusCode::UNAUTHORIZED, msg)),
                )
                    .into_response();
            }
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::NotAcceptable(msg) => (StatusCode::NOT_ACCEPTABLE, msg),
            ApiError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(_)
            | UserError::InvalidName(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidPassword(_)
            | UserError::InvalidRole(_)
            | UserError::EmptyUpdate => ApiError::UnprocessableEntity(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::InvalidToken(_) | UserError::TokenExpired => {
                ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
            }
            UserError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            UserError::Forbidden => ApiError::Forbidden(err.to_string()),
            UserError::NotAcceptable(msg) => ApiError::NotAcceptable(msg),
            UserError::SelfPrivilegeManagement => ApiError::BadRequest(err.to_string()),
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_)
            | UserError::AlreadyPrivileged(_)
            | UserError::NotPrivileged(_) => ApiError::Conflict(err.to_string()),
            UserError::StorageUnavailable(_) => {
                tracing::error!("Storage unavailable: {}", err);
                ApiError::ServiceUnavailable(err.to_string())
            }
            UserError::Hashing(_) | UserError::TokenGeneration(_) | UserError::Unknown(_) => {
                tracing::error!("Internal error: {}", err);
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// `?user_id=` query parameter shared by the user endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

impl UserIdQuery {
    pub fn parse(&self) -> Result<UserId, ApiError> {
        UserId::from_string(&self.user_id).map_err(|e| ApiError::from(UserError::from(e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public view of a user. Never includes the password hash or roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowUserData {
    pub user_id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub is_active: bool,
}

impl From<&User> for ShowUserData {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.to_string(),
            name: user.name.to_string(),
            surname: user.surname.to_string(),
            email: user.email.to_string(),
            is_active: user.is_active,
        }
    }
}

/// Body of the login and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessTokenData {
    pub access_token: String,
    pub token_type: String,
}

impl AccessTokenData {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}
