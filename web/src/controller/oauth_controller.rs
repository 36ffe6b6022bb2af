//! Controller for the Google OAuth login flow.
//!
//! Both legs always answer with a temporary redirect. Failures travel to the caller's
//! callback URL as an `error` query parameter.

use crate::params::oauth::{CallbackParams, LoginResultParams, LoginStartParams};
use crate::AppState;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use domain::oauth_login;
use log::*;
use serde_json::{json, Value};

/// GET /api/login/oauth/google
///
/// Starts a login by redirecting to Google's consent screen.
#[utoipa::path(
    get,
    path = "/api/login/oauth/google",
    params(LoginStartParams),
    responses(
        (status = 307, description = "Redirect to Google OAuth"),
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Query(params): Query<LoginStartParams>,
) -> impl IntoResponse {
    let url = app_state
        .login_flow
        .start(params.c.as_deref(), params.r.as_deref());

    Redirect::temporary(&url)
}

/// GET /api/oauth/google/callback
///
/// Handles the redirect back from Google and forwards the login result to the callback URL
/// carried in `state`.
#[utoipa::path(
    get,
    path = "/api/oauth/google/callback",
    params(CallbackParams),
    responses(
        (status = 307, description = "Redirect to the callback URL with either `token` or `error`"),
    )
)]
pub async fn callback(
    State(app_state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> impl IntoResponse {
    let url = app_state
        .login_flow
        .callback(
            params.code.as_deref(),
            params.state.as_deref(),
            params.error.as_deref(),
        )
        .await;

    Redirect::temporary(&url)
}

/// GET /api/oauth/debug/token
///
/// The default login callback. Decodes the login token and echoes it back as JSON.
#[utoipa::path(
    get,
    path = "/api/oauth/debug/token",
    params(LoginResultParams),
    responses(
        (status = 200, description = "The decoded login result"),
        (status = 400, description = "The login failed or the token is malformed"),
    )
)]
pub async fn debug_token(Query(params): Query<LoginResultParams>) -> impl IntoResponse {
    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": error })));
    }

    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing token" })),
        );
    };

    match oauth_login::decode_login_token(&token) {
        Ok(Value::Object(mut payload)) => {
            payload.insert("r".to_string(), json!(params.r));
            (StatusCode::OK, Json(Value::Object(payload)))
        }
        Ok(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid token" })),
        ),
        Err(e) => {
            warn!("Failed to decode login token: {e}");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid token" })),
            )
        }
    }
}
