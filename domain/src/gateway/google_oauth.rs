//! Google OAuth2 client.
//!
//! Exchanges authorization codes for access tokens and fetches the signed in user's
//! profile from the OpenID user-info endpoint. Every call is a single attempt.

use std::time::Duration;

use async_trait::async_trait;
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

use super::IdentityProvider;
use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind, OAuthErrorKind};

pub const GOOGLE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

/// OAuth token response from Google
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub id_token: Option<String>,
}

/// The user-info profile as Google returns it. Missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderProfile {
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub family_name: String,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub locale: String,
}

/// Request to exchange authorization code for tokens
#[derive(Debug, Serialize)]
struct TokenExchangeRequest<'a> {
    code: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    grant_type: &'a str,
}

/// Everything the client needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub userinfo_url: String,
    /// `None` leaves provider calls without a deadline.
    pub timeout: Option<Duration>,
}

impl GoogleOAuthConfig {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let (Some(client_id), Some(client_secret)) = (
            config.google_oauth_client_id().filter(|id| !id.is_empty()),
            config.google_oauth_client_secret().filter(|secret| !secret.is_empty()),
        ) else {
            error!("GOOGLE_OAUTH_CLIENT_ID and GOOGLE_OAUTH_CLIENT_SECRET must both be set");
            return Err(Error::new(DomainErrorKind::Internal(
                InternalErrorKind::Config,
            )));
        };

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri: config.google_oauth_redirect_uri(),
            scopes: GOOGLE_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: config.google_auth_url().to_string(),
            token_url: config.google_token_url().to_string(),
            userinfo_url: config.google_userinfo_url().to_string(),
            timeout: config.google_request_timeout(),
        })
    }
}

pub struct GoogleOAuthClient {
    client: reqwest::Client,
    config: GoogleOAuthConfig,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }
}

fn token_exchange_error(source: Option<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error {
        source,
        error_kind: DomainErrorKind::External(ExternalErrorKind::OAuth(
            OAuthErrorKind::TokenExchange,
        )),
    }
}

fn profile_fetch_error(source: Option<Box<dyn std::error::Error + Send + Sync>>) -> Error {
    Error {
        source,
        error_kind: DomainErrorKind::External(ExternalErrorKind::OAuth(
            OAuthErrorKind::ProfileFetch,
        )),
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        let scopes = self.config.scopes.join(" ");

        format!(
            "{}?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}&\
            access_type=offline&\
            state={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(state)
        )
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        let request = TokenExchangeRequest {
            code,
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
            redirect_uri: &self.config.redirect_uri,
            grant_type: "authorization_code",
        };

        debug!("Exchanging Google OAuth code for tokens");

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Google OAuth code: {e:?}");
                token_exchange_error(Some(Box::new(e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google OAuth token endpoint returned {status}: {error_text}");
            return Err(token_exchange_error(Some(
                format!("token endpoint returned {status}").into(),
            )));
        }

        let tokens: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Google token response: {e:?}");
            token_exchange_error(Some(Box::new(e)))
        })?;
        if tokens.access_token.is_empty() {
            warn!("Google token response carried an empty access token");
            return Err(token_exchange_error(None));
        }

        debug!("Exchanged Google OAuth code for tokens");
        Ok(tokens)
    }

    async fn get_user_info(&self, access_token: &str) -> Result<ProviderProfile, Error> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to get Google user info: {e:?}");
                profile_fetch_error(Some(Box::new(e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!("Google user info endpoint returned {status}: {error_text}");
            return Err(profile_fetch_error(Some(
                format!("user info endpoint returned {status}").into(),
            )));
        }

        let profile: ProviderProfile = response.json().await.map_err(|e| {
            warn!("Failed to parse Google user info: {e:?}");
            profile_fetch_error(Some(Box::new(e)))
        })?;
        if profile.email.is_empty() {
            warn!("Google user info for subject {} has no email", profile.sub);
            return Err(profile_fetch_error(None));
        }

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};

    fn test_config(server: &ServerGuard) -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret-456".to_string(),
            redirect_uri: "http://localhost:8080/api/oauth/google/callback".to_string(),
            scopes: GOOGLE_SCOPES.iter().map(|s| s.to_string()).collect(),
            auth_url: format!("{}/o/oauth2/auth", server.url()),
            token_url: format!("{}/token", server.url()),
            userinfo_url: format!("{}/oauth2/v3/userinfo", server.url()),
            timeout: None,
        }
    }

    #[tokio::test]
    async fn authorization_url_carries_client_scopes_and_state() {
        let server = Server::new_async().await;
        let client = GoogleOAuthClient::new(test_config(&server)).unwrap();

        let url = url::Url::parse(&client.authorization_url("c3RhdGU=")).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.path(), "/o/oauth2/auth");
        assert_eq!(params["client_id"], "client-123");
        assert_eq!(
            params["redirect_uri"],
            "http://localhost:8080/api/oauth/google/callback"
        );
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["access_type"], "offline");
        assert_eq!(params["state"], "c3RhdGU=");
        assert!(params["scope"].contains("userinfo.email"));
        assert!(params["scope"].contains("userinfo.profile"));
        assert!(!params.contains_key("prompt"));
    }

    #[tokio::test]
    async fn exchange_code_posts_form_and_parses_tokens() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("code".into(), "auth-code".into()),
                Matcher::UrlEncoded("client_id".into(), "client-123".into()),
                Matcher::UrlEncoded("client_secret".into(), "secret-456".into()),
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"access_token":"ya29.token","expires_in":3599,"token_type":"Bearer","refresh_token":"1//refresh"}"#,
            )
            .create_async()
            .await;

        let client = GoogleOAuthClient::new(test_config(&server)).unwrap();
        let tokens = client.exchange_code("auth-code").await.unwrap();

        mock.assert_async().await;
        assert_eq!(tokens.access_token, "ya29.token");
        assert_eq!(tokens.refresh_token.as_deref(), Some("1//refresh"));
    }

    #[tokio::test]
    async fn rejected_code_is_a_token_exchange_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let client = GoogleOAuthClient::new(test_config(&server)).unwrap();
        let err = client.exchange_code("stale").await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::OAuth(OAuthErrorKind::TokenExchange))
        );
    }

    #[tokio::test]
    async fn unreachable_token_endpoint_is_a_token_exchange_error() {
        let server = Server::new_async().await;
        let mut config = test_config(&server);
        config.token_url = "http://127.0.0.1:1/token".to_string();

        let client = GoogleOAuthClient::new(config).unwrap();
        let err = client.exchange_code("auth-code").await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::OAuth(OAuthErrorKind::TokenExchange))
        );
    }

    #[tokio::test]
    async fn get_user_info_sends_bearer_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/oauth2/v3/userinfo")
            .match_header("authorization", "Bearer ya29.token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"sub":"1089","name":"Ada Lovelace","given_name":"Ada","family_name":"Lovelace","picture":"https://lh3.example/a.png","email":"ada@example.com","email_verified":true,"locale":"en"}"#,
            )
            .create_async()
            .await;

        let client = GoogleOAuthClient::new(test_config(&server)).unwrap();
        let profile = client.get_user_info("ya29.token").await.unwrap();

        mock.assert_async().await;
        assert_eq!(profile.sub, "1089");
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.given_name, "Ada");
        assert!(profile.email_verified);
    }

    #[tokio::test]
    async fn sparse_profile_decodes_missing_fields_as_empty() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/oauth2/v3/userinfo")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sub":"1","email":"a@b.com"}"#)
            .create_async()
            .await;

        let client = GoogleOAuthClient::new(test_config(&server)).unwrap();
        let profile = client.get_user_info("t").await.unwrap();

        assert_eq!(profile.name, "");
        assert_eq!(profile.locale, "");
        assert!(!profile.email_verified);
    }

    #[tokio::test]
    async fn expired_access_token_is_a_profile_fetch_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/oauth2/v3/userinfo")
            .with_status(401)
            .create_async()
            .await;

        let client = GoogleOAuthClient::new(test_config(&server)).unwrap();
        let err = client.get_user_info("expired").await.unwrap_err();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::External(ExternalErrorKind::OAuth(OAuthErrorKind::ProfileFetch))
        );
    }

    #[tokio::test]
    async fn garbage_profile_body_is_a_profile_fetch_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/oauth2/v3/userinfo")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = GoogleOAuthClient::new(test_config(&server)).unwrap();
        assert!(client.get_user_info("t").await.is_err());
    }

    #[test]
    fn from_config_requires_client_credentials() {
        use clap::Parser;

        for args in [
            ["--google-oauth-client-id=", "--google-oauth-client-secret="],
            ["--google-oauth-client-id=id", "--google-oauth-client-secret="],
            ["--google-oauth-client-id=", "--google-oauth-client-secret=secret"],
        ] {
            let config = Config::parse_from(["scoreboard_api", args[0], args[1]]);
            let err = GoogleOAuthConfig::from_config(&config).unwrap_err();

            assert_eq!(
                err.error_kind,
                DomainErrorKind::Internal(InternalErrorKind::Config),
                "{args:?}"
            );
        }
    }

    #[test]
    fn from_config_uses_configured_credentials() {
        use clap::Parser;

        let config = Config::parse_from([
            "scoreboard_api",
            "--google-oauth-client-id=id",
            "--google-oauth-client-secret=secret",
        ]);
        let oauth = GoogleOAuthConfig::from_config(&config).unwrap();

        assert_eq!(oauth.client_id, "id");
        assert_eq!(oauth.client_secret, "secret");
        assert_eq!(oauth.scopes.len(), GOOGLE_SCOPES.len());
    }
}
