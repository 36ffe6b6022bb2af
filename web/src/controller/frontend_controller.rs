use crate::AppState;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use service::config::{FRONTEND_PATH, LOGIN_START_PATH};

const PAGE: &str = include_str!("frontend.html");

/// GET a minimal page that shows the result of a login
#[utoipa::path(
    get,
    path = "/frontend",
    responses(
        (status = 200, description = "HTML page that decodes and prints the login token", body = String, content_type = "text/html"),
    )
)]
pub async fn frontend(State(app_state): State<AppState>) -> impl IntoResponse {
    let callback = format!("{}{FRONTEND_PATH}", app_state.config.base_url());
    let login_url = format!(
        "{LOGIN_START_PATH}?c={}",
        urlencoding::encode(&callback)
    );

    Html(PAGE.replace("{{LOGIN_URL}}", &login_url))
}
