use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserIdQuery;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Query(query): Query<UserIdQuery>,
) -> Result<ApiSuccess<DeleteUserResponseData>, ApiError> {
    let user_id = query.parse()?;

    state
        .user_service
        .delete_user(&user_id, &actor)
        .await
        .map_err(ApiError::from)
        .map(|id| {
            ApiSuccess::new(
                StatusCode::OK,
                DeleteUserResponseData {
                    deleted_user_id: id.to_string(),
                },
            )
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteUserResponseData {
    pub deleted_user_id: String,
}
