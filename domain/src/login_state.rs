//! Self-contained login state carried through the identity provider's `state` parameter.
//!
//! The token is the callback URL, with the post-login redirect target appended as an
//! `r` query parameter when one is present, encoded as standard base64. Nothing is stored
//! server side, so any instance can serve the callback leg.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::*;

use crate::error::{DomainErrorKind, Error, InternalErrorKind};

/// Query parameter holding the post-login redirect target. It is reserved on callback URLs.
pub const REDIRECT_PARAM: &str = "r";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginState {
    pub callback_url: String,
    /// Where the caller wants to land after login. Empty means none was requested.
    pub redirect_to: String,
}

impl LoginState {
    pub fn new(callback_url: impl Into<String>, redirect_to: impl Into<String>) -> Self {
        Self {
            callback_url: callback_url.into(),
            redirect_to: redirect_to.into(),
        }
    }

    /// The callback URL with the redirect target attached, as it travels inside the token.
    pub fn target(&self) -> String {
        if self.redirect_to.is_empty() {
            self.callback_url.clone()
        } else {
            append_query(
                &self.callback_url,
                REDIRECT_PARAM,
                &escape_redirect(&self.redirect_to),
            )
        }
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(self.target())
    }

    pub fn decode(token: &str) -> Result<Self, Error> {
        let bytes = STANDARD.decode(token.trim()).map_err(|e| {
            warn!("Login state is not valid base64: {e}");
            Error::with_source(DomainErrorKind::Internal(InternalErrorKind::State), e)
        })?;
        let target = String::from_utf8(bytes).map_err(|e| {
            warn!("Login state is not valid UTF-8: {e}");
            Error::with_source(DomainErrorKind::Internal(InternalErrorKind::State), e)
        })?;

        Self::from_target(&target)
    }

    fn from_target(target: &str) -> Result<Self, Error> {
        let Some((callback_url, escaped)) = split_redirect(target) else {
            return Ok(Self::new(target, ""));
        };

        let redirect_to = urlencoding::decode(escaped).map_err(|e| {
            warn!("Login state redirect target is not valid UTF-8: {e}");
            Error::with_source(DomainErrorKind::Internal(InternalErrorKind::State), e)
        })?;

        Ok(Self::new(callback_url, redirect_to.into_owned()))
    }
}

/// Appends `key=value` to the query of `url`, using `&` when the URL already carries a
/// query. Any fragment stays at the end. `value` must already be escaped.
pub fn append_query(url: &str, key: &str, value: &str) -> String {
    let (base, fragment) = split_fragment(url);
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{base}{separator}{key}={value}{fragment}")
}

/// Drops every `key` pair from the query of `url`, keeping the other pairs in order.
pub fn remove_query_param(url: &str, key: &str) -> String {
    let (base, fragment) = split_fragment(url);
    let Some((path, query)) = base.split_once('?') else {
        return url.to_string();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| pair.split_once('=').map_or(*pair, |(k, _)| k) != key)
        .collect();

    if kept.is_empty() {
        format!("{path}{fragment}")
    } else {
        format!("{path}?{}{fragment}", kept.join("&"))
    }
}

/// Escapes a redirect target for use as a query value. Path punctuation such as `/` and
/// `:` passes through untouched so targets like `/dashboard` stay readable. Query
/// delimiters, `%`, `+`, whitespace and non-ASCII are percent-encoded.
pub fn escape_redirect(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || "-._~/:@!$'()*,;=".contains(c) {
            escaped.push(c);
        } else {
            let mut buf = [0u8; 4];
            escaped.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    escaped
}

fn split_fragment(url: &str) -> (&str, &str) {
    match url.find('#') {
        Some(at) => url.split_at(at),
        None => (url, ""),
    }
}

// The redirect target is always the last query pair, and its escaped form never
// contains `?`, `&` or `#`.
fn split_redirect(target: &str) -> Option<(String, &str)> {
    let (base, fragment) = split_fragment(target);
    let pair_start = base.rfind(['?', '&'])?;
    let value = base[pair_start + 1..].strip_prefix("r=")?;
    Some((format!("{}{fragment}", &base[..pair_start]), value))
}
