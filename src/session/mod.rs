//! Anonymous, cookie based sessions.
//!
//! A session is nothing more than a random [SessionId] held by the client in
//! the `sessionId` cookie. The server keeps no session records, so anyone
//! holding the cookie value can read the transactions it owns.

mod cookie;
mod middleware;

pub use cookie::{SESSION_COOKIE, SESSION_COOKIE_MAX_AGE, get_session_id, set_session_cookie};
pub use middleware::session_guard;
