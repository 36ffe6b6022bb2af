//! Clients for external services reached over HTTP.

use async_trait::async_trait;

use crate::error::Error;

pub mod google_oauth;

pub use google_oauth::{GoogleOAuthClient, GoogleOAuthConfig, ProviderProfile, TokenResponse};

/// An OAuth2 identity provider implementing the authorization-code grant and a
/// user-info endpoint.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The provider's consent URL carrying `state` back to our callback unchanged.
    fn authorization_url(&self, state: &str) -> String;

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error>;

    async fn get_user_info(&self, access_token: &str) -> Result<ProviderProfile, Error>;
}
