//! Session cookie handling
//!
//! An opaque UUID in an HttpOnly cookie is the only session identity; the
//! server-side state it points at is process-memory-resident.

use axum::http::{header, HeaderMap, HeaderValue};
use std::time::Duration;
use uuid::Uuid;

/// Cookie carrying the interview session identifier
pub const SESSION_COOKIE: &str = "codemock_session";

/// Extract the session id from the request's Cookie header
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value.trim()).ok()
        } else {
            None
        }
    })
}

/// Build the Set-Cookie value that pins `id` to this browser session
pub fn session_cookie(id: Uuid, ttl: Duration) -> HeaderValue {
    let cookie = format!(
        "{SESSION_COOKIE}={id}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        ttl.as_secs()
    );
    HeaderValue::from_str(&cookie).expect("uuid cookie is always a valid header value")
}
