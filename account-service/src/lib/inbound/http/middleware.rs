use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::user::models::User;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::INVALID_TOKEN_MESSAGE;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Extension type holding the user behind the bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that resolves the bearer token to a user and adds it to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?.to_string();

    let user = state
        .auth_service
        .authenticate(&token)
        .await
        .map_err(|e| match e {
            UserError::StorageUnavailable(_) => ApiError::from(e).into_response(),
            _ => ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()).into_response(),
        })?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let unauthorized = || ApiError::Unauthorized("Not authenticated".to_string()).into_response();

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(unauthorized)?;

    let auth_str = auth_header.to_str().map_err(|_| unauthorized())?;

    auth_str
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(unauthorized)
}
