//! Defines the app level error type and its conversion into JSON responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::validation::FieldError;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request path, query or body did not pass validation.
    ///
    /// Raised before any data access happens. Each [FieldError] describes one
    /// problem with the input so the client can fix all of them at once.
    #[error("invalid input: {0:?}")]
    Validation(Vec<FieldError>),

    /// The session cookie is missing from the request, or its value is not a
    /// valid session ID.
    #[error("the session cookie is missing or invalid")]
    MissingSession,

    /// The request body is larger than the server is willing to read.
    #[error("the request body is too large")]
    PayloadTooLarge,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Error::PayloadTooLarge;
        }

        Error::Validation(vec![FieldError::unattributed(rejection.body_text())])
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(vec![FieldError::unattributed(rejection.body_text())])
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(issues) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Validation error.", "issues": issues })),
            )
                .into_response(),
            Error::MissingSession => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized." })),
            )
                .into_response(),
            Error::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({ "error": "Payload too large." })),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}
