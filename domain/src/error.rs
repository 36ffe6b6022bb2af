//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `web` uses the `error_kind` to pick an HTTP status for the
/// JSON endpoints, and `redirect_message` to fill the `error` parameter of a login redirect.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    /// The login state token could not be decoded.
    State,
    /// The user directory could not establish a user record.
    Directory,
    Config,
    Other(String),
}

/// Enum representing the various kinds of entity errors that can bubble up from the "Entity" layer (`entity_api` and `entity`).
/// These errors are translated from the `entity_api` layer to the `domain` layer and reduced to a subset of error kinds
/// that are relevant to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    Conflict,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    OAuth(OAuthErrorKind),
    Network,
}

/// Failures talking to the identity provider.
#[derive(Debug, PartialEq)]
pub enum OAuthErrorKind {
    TokenExchange,
    ProfileFetch,
}

impl Error {
    pub fn new(error_kind: DomainErrorKind) -> Self {
        Error {
            source: None,
            error_kind,
        }
    }

    pub fn with_source(
        error_kind: DomainErrorKind,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Error {
            source: Some(source.into()),
            error_kind,
        }
    }

    /// A short message that is safe to hand back to a browser. It never includes
    /// provider response bodies or database error text.
    pub fn redirect_message(&self) -> String {
        let message = match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::State) => "Invalid state",
            DomainErrorKind::Internal(InternalErrorKind::Directory) => {
                "Failed to find or create user"
            }
            DomainErrorKind::Internal(InternalErrorKind::Config) => "Login is not configured",
            DomainErrorKind::Internal(InternalErrorKind::Entity(_)) => "User storage error",
            DomainErrorKind::Internal(InternalErrorKind::Other(_)) => "Internal error",
            DomainErrorKind::External(ExternalErrorKind::OAuth(OAuthErrorKind::TokenExchange)) => {
                "Failed to exchange authorization code"
            }
            DomainErrorKind::External(ExternalErrorKind::OAuth(OAuthErrorKind::ProfileFetch)) => {
                "Failed to fetch user profile"
            }
            DomainErrorKind::External(ExternalErrorKind::Network) => "Identity provider unreachable",
        };
        message.to_string()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::RecordAlreadyExists => EntityErrorKind::Conflict,
            _ => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "JSON serialization error".to_string(),
            )),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors that result from issues building the reqwest::Client instance. This
        // type of error will occur prior to any network calls being made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        // Errors that result from issues with the network call itself.
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_not_found_translates_to_domain_not_found() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
        .into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn duplicate_record_translates_to_conflict() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordAlreadyExists,
        }
        .into();

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Conflict))
        );
    }

    #[test]
    fn redirect_messages_do_not_leak_source_details() {
        let err = Error::with_source(
            DomainErrorKind::External(ExternalErrorKind::OAuth(OAuthErrorKind::TokenExchange)),
            "invalid_grant: Bad Request from https://oauth2.googleapis.com/token".to_string(),
        );

        assert_eq!(err.redirect_message(), "Failed to exchange authorization code");
    }

    #[test]
    fn invalid_state_has_the_documented_message() {
        let err = Error::new(DomainErrorKind::Internal(InternalErrorKind::State));
        assert_eq!(err.redirect_message(), "Invalid state");
    }
}
