use serde::Deserialize;
use utoipa::ToSchema;

/// Body of `POST /api/scoreboards`.
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({"name": "Weekly League"}))]
pub(crate) struct CreateParams {
    pub(crate) name: String,
}

/// Body of `PUT /api/scoreboards/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) name: String,
}
