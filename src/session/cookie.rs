//! Session cookie construction and parsing.
//!
//! The session id travels in one cookie whose name is fixed by
//! [`SESSION_COOKIE_NAME`]. Both the login path that sets it and the
//! validation path that reads it go through this module.

use cookie::time::{Duration as CookieDuration, OffsetDateTime};
use cookie::{Cookie, SameSite};

use super::SessionConfig;

/// The only cookie name a session is ever written to or read from.
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// `HttpOnly`, `Path=/`, `SameSite=Lax`, `Max-Age` equal to the session
/// lifetime.
pub fn session_cookie(session_id: &str, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id.to_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::seconds(config.cookie_max_age_secs()))
        .build()
}

/// Empty value with immediate expiry, overwriting the session cookie.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, String::new()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(CookieDuration::ZERO)
        .expires(OffsetDateTime::UNIX_EPOCH)
        .build()
}

/// Finds the session id in the value of a `Cookie` request header.
///
/// Malformed pairs are skipped; an empty value counts as absent.
pub fn session_id_from_header(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .map(|c| c.value().to_owned())
        .filter(|value| !value.is_empty())
}
