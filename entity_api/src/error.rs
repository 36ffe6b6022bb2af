//! Error types for entity API
use std::error::Error as StdError;
use std::fmt;

use serde::Serialize;

use sea_orm::error::{DbErr, SqlErr};

/// Errors while executing operations related to entities.
/// The intent is to categorize errors into two major types:
///  * Errors related to data. Ex DbError::RecordNotFound
///  * Errors related to interactions with the database itself. Ex DbError::Conn
#[derive(Debug, PartialEq)]
pub struct Error {
    // Underlying error emitted from seaORM internals
    pub source: Option<DbErr>,
    // Enum representing which category of error
    pub error_kind: EntityApiErrorKind,
}

#[derive(Debug, PartialEq, Serialize)]
pub enum EntityApiErrorKind {
    // Record not found
    RecordNotFound,
    // Record not updated
    RecordNotUpdated,
    // A unique constraint rejected the write, e.g. a second user with the same email
    RecordAlreadyExists,
    // Errors related to interactions with the database itself. Ex DbError::Conn
    SystemError,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Entity API Error: {:?}", self)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        let error_kind = error_kind_for(&err, err.sql_err());
        Error {
            source: Some(err),
            error_kind,
        }
    }
}

// Constraint violations are only visible through the driver's SQL error code.
fn error_kind_for(err: &DbErr, sql_err: Option<SqlErr>) -> EntityApiErrorKind {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = sql_err {
        return EntityApiErrorKind::RecordAlreadyExists;
    }

    match err {
        DbErr::RecordNotFound(_) => EntityApiErrorKind::RecordNotFound,
        DbErr::RecordNotUpdated => EntityApiErrorKind::RecordNotUpdated,
        _ => EntityApiErrorKind::SystemError,
    }
}
