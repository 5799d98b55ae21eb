use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::update_user::UpdateUserResponseData;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::UserIdQuery;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn grant_admin_privilege(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Query(query): Query<UserIdQuery>,
) -> Result<ApiSuccess<UpdateUserResponseData>, ApiError> {
    let user_id = query.parse()?;

    state
        .user_service
        .promote_user(&user_id, &actor)
        .await
        .map_err(ApiError::from)
        .map(updated)
}

pub async fn revoke_admin_privilege(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Query(query): Query<UserIdQuery>,
) -> Result<ApiSuccess<UpdateUserResponseData>, ApiError> {
    let user_id = query.parse()?;

    state
        .user_service
        .demote_user(&user_id, &actor)
        .await
        .map_err(ApiError::from)
        .map(updated)
}

fn updated(id: crate::domain::user::models::UserId) -> ApiSuccess<UpdateUserResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        UpdateUserResponseData {
            updated_user_id: id.to_string(),
        },
    )
}
