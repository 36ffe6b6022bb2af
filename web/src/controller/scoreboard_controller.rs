use crate::controller::ApiResponse;
use crate::params::scoreboard::{CreateParams, UpdateParams};
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::Id;

use log::*;

/// GET all Scoreboards, oldest first
#[utoipa::path(
    get,
    path = "/api/scoreboards",
    responses(
        (status = 200, description = "Successfully retrieved all Scoreboards", body = [domain::scoreboards::Model]),
        (status = 405, description = "Method not allowed"),
        (status = 503, description = "Service temporarily unavailable")
    )
)]
pub async fn index(State(app_state): State<AppState>) -> Result<impl IntoResponse, Error> {
    debug!("GET all Scoreboards");

    let scoreboards = app_state.scoreboards.list().await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), scoreboards)))
}

/// GET a particular Scoreboard specified by its id.
#[utoipa::path(
    get,
    path = "/api/scoreboards/{id}",
    params(
        ("id" = String, Path, description = "Scoreboard id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a specific Scoreboard by its id", body = domain::scoreboards::Model),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Scoreboard not found"),
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Scoreboard by id: {id}");

    let scoreboard = app_state.scoreboards.get(id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), scoreboard)))
}

/// POST create a new Scoreboard
#[utoipa::path(
    post,
    path = "/api/scoreboards",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully Created a New Scoreboard", body = domain::scoreboards::Model),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn create(
    State(app_state): State<AppState>,
    Json(params): Json<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("POST Create a New Scoreboard from: {params:?}");

    let scoreboard = app_state.scoreboards.create(params.name).await?;

    debug!("New Scoreboard: {scoreboard:?}");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), scoreboard)),
    ))
}

/// PUT rename a Scoreboard
#[utoipa::path(
    put,
    path = "/api/scoreboards/{id}",
    params(
        ("id" = String, Path, description = "Id of the Scoreboard to update"),
    ),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully Updated Scoreboard", body = domain::scoreboards::Model),
        (status = 404, description = "Scoreboard not found"),
        (status = 422, description = "Unprocessable Entity"),
    )
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    Json(params): Json<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("PUT Update Scoreboard with id: {id}");

    let scoreboard = app_state.scoreboards.update(id, params.name).await?;

    debug!("Updated Scoreboard: {scoreboard:?}");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), scoreboard)))
}

/// DELETE a Scoreboard specified by its id.
#[utoipa::path(
    delete,
    path = "/api/scoreboards/{id}",
    params(
        ("id" = String, Path, description = "Id of the Scoreboard to delete"),
    ),
    responses(
        (status = 204, description = "Successfully deleted the Scoreboard"),
        (status = 404, description = "Scoreboard not found"),
    )
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("DELETE Scoreboard by id: {id}");

    app_state.scoreboards.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
