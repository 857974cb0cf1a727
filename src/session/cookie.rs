//! Reads and writes the session cookie.

use axum_extra::extract::{CookieJar, cookie::Cookie};
use time::Duration;
use uuid::Uuid;

use crate::database_id::SessionId;

/// The name of the cookie holding the session ID.
pub const SESSION_COOKIE: &str = "sessionId";
/// How long the client should keep the session cookie.
pub const SESSION_COOKIE_MAX_AGE: Duration = Duration::days(7);

/// Get the session ID from the cookie jar.
///
/// Returns `None` if the cookie is missing or does not hold a valid UUID.
pub fn get_session_id(jar: &CookieJar) -> Option<SessionId> {
    let cookie = jar.get(SESSION_COOKIE)?;

    match Uuid::parse_str(cookie.value_trimmed()) {
        Ok(uuid) => Some(SessionId::from_uuid(uuid)),
        Err(error) => {
            tracing::debug!("Ignoring malformed session cookie: {error}");
            None
        }
    }
}

/// Add the session cookie for `session_id` to the cookie jar.
///
/// The cookie is sent for every path and expires after [SESSION_COOKIE_MAX_AGE].
pub fn set_session_cookie(jar: CookieJar, session_id: SessionId) -> CookieJar {
    jar.add(
        Cookie::build((SESSION_COOKIE, session_id.to_string()))
            .path("/")
            .max_age(SESSION_COOKIE_MAX_AGE),
    )
}
