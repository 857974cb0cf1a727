//! The response for routes that do not exist.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Fallback handler for any route that is not defined.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// A 404 response with a JSON error message.
pub fn get_404_not_found_response() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Not found." })),
    )
        .into_response()
}
