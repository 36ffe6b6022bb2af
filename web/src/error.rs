use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
                    }
                    EntityErrorKind::Invalid => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
                    }
                    EntityErrorKind::Conflict => {
                        (StatusCode::CONFLICT, "CONFLICT").into_response()
                    }
                    EntityErrorKind::Other(message) => {
                        error!("Entity error: {message}");
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                    }
                },
                InternalErrorKind::State => {
                    (StatusCode::BAD_REQUEST, "BAD REQUEST").into_response()
                }
                InternalErrorKind::Directory
                | InternalErrorKind::Config
                | InternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::OAuth(_) | ExternalErrorKind::Network => {
                    (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
                }
            },
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error_kind: DomainErrorKind) -> StatusCode {
        Error(DomainError::new(error_kind)).into_response().status()
    }

    #[test]
    fn maps_domain_errors_to_http_statuses() {
        let cases = [
            (
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound)),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid)),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Conflict)),
                StatusCode::CONFLICT,
            ),
            (
                DomainErrorKind::Internal(InternalErrorKind::Directory),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainErrorKind::External(ExternalErrorKind::Network),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (kind, expected) in cases {
            assert_eq!(status_of(kind), expected);
        }
    }
}
