use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::activate_user::activate_user;
use super::handlers::admin_privilege::grant_admin_privilege;
use super::handlers::admin_privilege::revoke_admin_privilege;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_user::get_user;
use super::handlers::login::login;
use super::handlers::refresh_token::refresh_token;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::authentication::ports::AuthServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub auth_service: Arc<dyn AuthServicePort>,
    /// Whether the refresh cookie is marked `Secure`.
    pub cookie_secure: bool,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    auth_service: Arc<dyn AuthServicePort>,
    cookie_secure: bool,
) -> Router {
    let state = AppState {
        user_service,
        auth_service,
        cookie_secure,
    };

    let public_routes = Router::new()
        .route("/v1/login", post(login))
        .route("/v1/login/token", post(refresh_token))
        .route("/v1/users", post(create_user));

    let protected_routes = Router::new()
        .route(
            "/v1/users",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/v1/users/activate", post(activate_user))
        .route(
            "/v1/users/admin_privilege",
            patch(grant_admin_privilege).delete(revoke_admin_privilege),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry bearer tokens and cookies.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
