//! Moves the session cookie between [`HeaderMap`]s and the session layer.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};

use crate::AuthError;
use crate::session::SessionConfig;
use crate::session::cookie::{removal_cookie, session_cookie, session_id_from_header};

fn append(headers: &mut HeaderMap, rendered: &str) -> Result<(), AuthError> {
    let value = HeaderValue::from_str(rendered)
        .map_err(|e| AuthError::Internal(format!("invalid Set-Cookie header: {e}")))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}

/// Appends a `Set-Cookie` carrying `session_id`.
pub fn attach_session_cookie(
    headers: &mut HeaderMap,
    session_id: &str,
    config: &SessionConfig,
) -> Result<(), AuthError> {
    append(headers, &session_cookie(session_id, config).to_string())
}

/// Appends a `Set-Cookie` that deletes the session cookie in the browser.
pub fn clear_session_cookie(headers: &mut HeaderMap, config: &SessionConfig) -> Result<(), AuthError> {
    append(headers, &removal_cookie(config).to_string())
}

/// Reads the session id from the request's `Cookie` headers.
///
/// HTTP/2 clients may split cookies across several headers, so all of them
/// are searched.
pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(session_id_from_header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_then_extract() {
        let config = SessionConfig::default();
        let mut response_headers = HeaderMap::new();
        attach_session_cookie(&mut response_headers, "abc123", &config).unwrap();

        let set_cookie = response_headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("session_id=abc123"));

        let mut request_headers = HeaderMap::new();
        request_headers.insert(COOKIE, HeaderValue::from_static("theme=dark; session_id=abc123"));
        assert_eq!(extract_session_id(&request_headers), Some("abc123".to_owned()));
    }

    #[test]
    fn test_extract_across_split_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("session_id=xyz"));
        assert_eq!(extract_session_id(&headers), Some("xyz".to_owned()));
    }

    #[test]
    fn test_extract_missing() {
        assert_eq!(extract_session_id(&HeaderMap::new()), None);
    }

    #[test]
    fn test_clear() {
        let mut headers = HeaderMap::new();
        clear_session_cookie(&mut headers, &SessionConfig::default()).unwrap();

        let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("session_id=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
