use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;

use super::login::REFRESH_TOKEN_COOKIE;
use super::AccessTokenData;
use super::ApiError;
use super::ApiSuccess;
use super::INVALID_TOKEN_MESSAGE;
use crate::inbound::http::router::AppState;

pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ApiSuccess<AccessTokenData>, ApiError> {
    let refresh_token = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))?;

    let access_token = state.auth_service.refresh(&refresh_token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AccessTokenData::bearer(access_token),
    ))
}
