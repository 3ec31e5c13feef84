//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Boxed driver-level cause carried by decode failures.
pub type BoxDynError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";

/// Failures of the entity access core. None of them are retried.
#[derive(Error, Debug)]
pub enum EntityError {
    #[error("invalid entity name: {0:?}")]
    InvalidIdentifier(String),
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("decode column '{column}': {source}")]
    Decode {
        column: String,
        #[source]
        source: BoxDynError,
    },
}

impl EntityError {
    /// True when the query referenced a table that does not exist.
    pub fn is_undefined_table(&self) -> bool {
        match self {
            EntityError::Query(sqlx::Error::Database(db)) => db.code().as_deref() == Some(UNDEFINED_TABLE),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for EntityError {
    fn from(e: sqlx::Error) -> Self {
        EntityError::Query(e)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no database URL configured (set {0})")]
    MissingDatabaseUrl(&'static str),
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Errors surfaced by the HTTP adapter.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Entity(e @ EntityError::Query(_)) if e.is_undefined_table() => {
                (StatusCode::NOT_FOUND, "not_found")
            }
            AppError::Entity(EntityError::InvalidIdentifier(_)) => (StatusCode::BAD_REQUEST, "invalid_entity_name"),
            AppError::Entity(EntityError::Query(_)) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
            AppError::Entity(EntityError::Decode { .. }) => (StatusCode::INTERNAL_SERVER_ERROR, "decode_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        }
    }
}

/// Renders an error with its full `source()` chain, outermost first.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut cur = err.source();
    while let Some(cause) = cur {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        cur = cause.source();
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %error_chain(&self), "request failed");
        } else {
            tracing::debug!(code, error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
