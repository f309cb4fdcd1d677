//! Session cookie encoding and parsing.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use uuid::Uuid;

use super::SESSION_TTL_SECS;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "gmail_session";

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(id: Uuid, secure: bool) -> String {
    build(&id.to_string(), SESSION_TTL_SECS, secure)
}

/// `Set-Cookie` value that deletes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    build("", 0, secure)
}

fn build(value: &str, max_age: i64, secure: bool) -> String {
    let mut cookie =
        format!("{SESSION_COOKIE}={value}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Session id from the request's `Cookie` headers, if present and well-formed.
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}
