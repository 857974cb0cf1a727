//! Input validation for request paths and bodies.
//!
//! Handlers never see unvalidated input: [ValidJson] and [ValidPath] run
//! before the handler body and reject the request with
//! [Error::Validation] when the input does not fit.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// A single problem found while validating client input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// The name of the offending field, if the problem can be pinned to one.
    pub field: Option<String>,
    /// A human readable description of the problem.
    pub message: String,
}

impl FieldError {
    /// Create an error for the field named `field`.
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: Some(field.to_owned()),
            message: message.to_owned(),
        }
    }

    /// Create an error that cannot be pinned to a single field, e.g. a body
    /// or path parameter that could not be parsed at all.
    pub fn unattributed(message: String) -> Self {
        Self {
            field: None,
            message,
        }
    }
}

/// Rules that a deserialized value must satisfy before it is handed to a handler.
pub trait Validate {
    /// Check the value, collecting every problem rather than stopping at the first.
    ///
    /// # Errors
    /// Returns the list of problems if the value is invalid.
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// A JSON body extractor that deserializes `T` and then checks it with [Validate].
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;
        value.validate().map_err(Error::Validation)?;

        Ok(Self(value))
    }
}

/// A path parameter extractor that reports malformed parameters as [Error::Validation].
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;

        Ok(Self(value))
    }
}
