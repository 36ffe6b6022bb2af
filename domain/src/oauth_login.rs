//! The two legs of an OAuth login.
//!
//! `start` sends the browser to the identity provider with everything the callback leg
//! needs packed into `state`. `callback` turns whatever the provider sends back into a
//! redirect to the caller's callback URL, carrying either a `token` or an `error`.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::*;
use serde_json::json;
use url::Url;

use crate::error::{DomainErrorKind, Error, InternalErrorKind};
use crate::gateway::IdentityProvider;
use crate::login_state::{
    append_query, escape_redirect, remove_query_param, LoginState, REDIRECT_PARAM,
};
use crate::user::{find_or_create_with_profile, Profile, UserStore};

pub const INVALID_STATE: &str = "Invalid state";
pub const INVALID_CALLBACK_URL: &str = "Invalid callback URL";

pub struct LoginFlow {
    provider: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserStore>,
    default_callback_url: String,
}

impl LoginFlow {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        users: Arc<dyn UserStore>,
        default_callback_url: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            users,
            default_callback_url: default_callback_url.into(),
        }
    }

    /// Returns the provider authorization URL for a login that ends at `callback`
    /// (or the default callback) and then wants to land on `redirect_to`. An `r` pair
    /// already on the callback is dropped, since `r` carries `redirect_to`.
    pub fn start(&self, callback: Option<&str>, redirect_to: Option<&str>) -> String {
        let callback = remove_query_param(
            callback
                .filter(|c| !c.is_empty())
                .unwrap_or(self.default_callback_url.as_str()),
            REDIRECT_PARAM,
        );
        let state = LoginState::new(callback.as_str(), redirect_to.unwrap_or_default());

        info!("Starting OAuth login with callback {callback}");

        self.provider.authorization_url(&state.encode())
    }

    /// Completes a login and returns where the browser goes next. Every outcome is a
    /// URL: failures land on the callback (or the default callback when `state` is
    /// unusable) with an `error` parameter.
    pub async fn callback(
        &self,
        code: Option<&str>,
        state: Option<&str>,
        error: Option<&str>,
    ) -> String {
        let state = match state.filter(|s| !s.is_empty()).map(LoginState::decode) {
            Some(Ok(state)) => state,
            Some(Err(e)) => {
                warn!("Rejecting OAuth callback with undecodable state: {e}");
                return self.error_redirect(&self.default_callback_url, INVALID_STATE);
            }
            None => {
                warn!("Rejecting OAuth callback without state");
                return self.error_redirect(&self.default_callback_url, INVALID_STATE);
            }
        };

        if !self.is_valid_callback(&state.callback_url) {
            warn!(
                "Rejecting OAuth callback to invalid URL {:?}",
                state.callback_url
            );
            return self.error_redirect(&self.default_callback_url, INVALID_CALLBACK_URL);
        }

        if let Some(provider_error) = error.filter(|e| !e.is_empty()) {
            info!("Identity provider reported login error: {provider_error}");
            return self.error_redirect(&state.callback_url, provider_error);
        }

        match self.complete(code.unwrap_or_default()).await {
            Ok(token) => {
                let mut target = append_query(
                    &state.callback_url,
                    "token",
                    &urlencoding::encode(&token),
                );
                if !state.redirect_to.is_empty() {
                    target = append_query(
                        &target,
                        REDIRECT_PARAM,
                        &escape_redirect(&state.redirect_to),
                    );
                }
                target
            }
            Err(e) => self.error_redirect(&state.callback_url, &e.redirect_message()),
        }
    }

    // Exchange, profile and directory steps, producing the base64 login token.
    async fn complete(&self, code: &str) -> Result<String, Error> {
        let tokens = self.provider.exchange_code(code).await.inspect_err(|e| {
            warn!("OAuth code exchange failed: {e}");
        })?;

        let profile = self
            .provider
            .get_user_info(&tokens.access_token)
            .await
            .inspect_err(|e| warn!("OAuth profile fetch failed: {e}"))?;

        let user = find_or_create_with_profile(self.users.as_ref(), Profile::from(&profile))
            .await
            .inspect_err(|e| error!("Failed to find or create user {}: {e}", profile.email))?;

        info!("User {} logged in as {}", user.id, user.email);

        let payload = serde_json::to_vec(&json!({
            "user": profile,
            "dbUser": user,
        }))?;
        Ok(STANDARD.encode(payload))
    }

    fn is_valid_callback(&self, callback_url: &str) -> bool {
        // Relative callbacks are resolved against the default callback.
        Url::parse(&self.default_callback_url)
            .and_then(|base| base.join(callback_url))
            .is_ok()
    }

    fn error_redirect(&self, callback_url: &str, message: &str) -> String {
        append_query(callback_url, "error", &urlencoding::encode(message))
    }
}

/// Reverses the encoding of the `token` a successful login hands to its callback.
pub fn decode_login_token(token: &str) -> Result<serde_json::Value, Error> {
    // Query decoding turns an unescaped `+` into a space.
    let token = token.trim().replace(' ', "+");
    let bytes = STANDARD.decode(token).map_err(|e| {
        Error::with_source(DomainErrorKind::Internal(InternalErrorKind::State), e)
    })?;

    serde_json::from_slice(&bytes)
        .map_err(|e| Error::with_source(DomainErrorKind::Internal(InternalErrorKind::State), e))
}
