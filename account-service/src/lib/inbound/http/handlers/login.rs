use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use serde::Deserialize;

use super::AccessTokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

/// Name of the cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

/// Form-encoded credentials. `username` holds the email address.
#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, ApiSuccess<AccessTokenData>), ApiError> {
    let pair = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;

    let max_age = state.auth_service.refresh_token_ttl().num_seconds();
    let cookie = Cookie::build((REFRESH_TOKEN_COOKIE, pair.refresh_token))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(state.cookie_secure)
        .path("/")
        .max_age(time::Duration::seconds(max_age));

    Ok((
        jar.add(cookie),
        ApiSuccess::new(StatusCode::OK, AccessTokenData::bearer(pair.access_token)),
    ))
}
