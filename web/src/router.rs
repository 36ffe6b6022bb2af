use crate::{
    controller::{
        frontend_controller, health_check_controller, oauth_controller, scoreboard_controller,
    },
    params, AppState,
};
use axum::{
    routing::{get, post},
    Router,
};
use service::config::{DEBUG_TOKEN_PATH, FRONTEND_PATH, GOOGLE_CALLBACK_PATH, LOGIN_START_PATH};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Scoreboard API"
        ),
        paths(
            health_check_controller::health_check,
            scoreboard_controller::index,
            scoreboard_controller::read,
            scoreboard_controller::create,
            scoreboard_controller::update,
            scoreboard_controller::delete,
            oauth_controller::login,
            oauth_controller::callback,
            oauth_controller::debug_token,
            frontend_controller::frontend,
        ),
        components(
            schemas(
                domain::scoreboards::Model,
                domain::users::Model,
                params::scoreboard::CreateParams,
                params::scoreboard::UpdateParams,
            )
        ),
        tags(
            (name = "scoreboard_api", description = "Scoreboards and Google login")
        )
    )]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(scoreboard_routes(app_state.clone()))
        .merge(oauth_routes(app_state.clone()))
        .merge(frontend_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
}

fn health_routes() -> Router {
    Router::new().route("/healthz", get(health_check_controller::health_check))
}

fn scoreboard_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/scoreboards",
            post(scoreboard_controller::create).get(scoreboard_controller::index),
        )
        .route(
            "/api/scoreboards/{id}",
            get(scoreboard_controller::read)
                .put(scoreboard_controller::update)
                .delete(scoreboard_controller::delete),
        )
        .with_state(app_state)
}

/// Routes for the Google OAuth login flow
fn oauth_routes(app_state: AppState) -> Router {
    Router::new()
        .route(LOGIN_START_PATH, get(oauth_controller::login))
        .route(GOOGLE_CALLBACK_PATH, get(oauth_controller::callback))
        .route(DEBUG_TOKEN_PATH, get(oauth_controller::debug_token))
        .with_state(app_state)
}

fn frontend_routes(app_state: AppState) -> Router {
    Router::new()
        .route(FRONTEND_PATH, get(frontend_controller::frontend))
        .with_state(app_state)
}
