use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for starting a login
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct LoginStartParams {
    /// Callback URL that receives the login result. Defaults to the debug token endpoint.
    pub(crate) c: Option<String>,
    /// Opaque post-login redirect target handed back to the callback as `r`.
    pub(crate) r: Option<String>,
}

/// Query parameters the identity provider sends to the callback
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct CallbackParams {
    pub(crate) code: Option<String>,
    pub(crate) state: Option<String>,
    /// Set by the provider when the user denied consent or the request was rejected.
    pub(crate) error: Option<String>,
}

/// Query parameters a login callback receives
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct LoginResultParams {
    pub(crate) token: Option<String>,
    pub(crate) error: Option<String>,
    pub(crate) r: Option<String>,
}
