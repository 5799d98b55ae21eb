use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::UpdateUserCommand;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserIdQuery;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for updating a user (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub old_password: String,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub email: Option<String>,
    pub new_password: Option<String>,
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, UserError> {
        // Validation happens here - errors are automatically converted via #[from]
        let name = self
            .name
            .map(|name| PersonName::new("Name", name))
            .transpose()?;
        let surname = self
            .surname
            .map(|surname| PersonName::new("Surname", surname))
            .transpose()?;
        let email = self.email.map(EmailAddress::new).transpose()?;
        let new_password = self.new_password.map(Password::new).transpose()?;

        Ok(UpdateUserCommand {
            old_password: self.old_password,
            name,
            surname,
            email,
            new_password,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateUserResponseData {
    pub updated_user_id: String,
}

pub async fn update_user(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Query(query): Query<UserIdQuery>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UpdateUserResponseData>, ApiError> {
    let user_id = query.parse()?;
    let command = req.try_into_command()?;

    state
        .user_service
        .update_user(&user_id, &actor, command)
        .await
        .map_err(ApiError::from)
        .map(|id| {
            ApiSuccess::new(
                StatusCode::OK,
                UpdateUserResponseData {
                    updated_user_id: id.to_string(),
                },
            )
        })
}
