use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::ShowUserData;
use super::UserIdQuery;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;

pub async fn get_user(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    Query(query): Query<UserIdQuery>,
) -> Result<ApiSuccess<ShowUserData>, ApiError> {
    let user_id = query.parse()?;

    state
        .user_service
        .get_user(&user_id, &actor)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}
