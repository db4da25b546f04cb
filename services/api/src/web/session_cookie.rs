//! services/api/src/web/session_cookie.rs
//!
//! Builds and reads the admin session cookie.

use axum::http::{header, HeaderMap};
use chrono::TimeDelta;

pub const SESSION_COOKIE: &str = "launchpad.sid";

/// Admin sessions last one day.
pub fn session_lifetime() -> TimeDelta {
    TimeDelta::hours(24)
}

fn attributes(production: bool) -> &'static str {
    if production {
        "HttpOnly; Secure; SameSite=None; Path=/"
    } else {
        "HttpOnly; SameSite=Lax; Path=/"
    }
}

pub fn issue(session_id: &str, production: bool) -> String {
    format!(
        "{}={}; {}; Max-Age={}",
        SESSION_COOKIE,
        session_id,
        attributes(production),
        session_lifetime().num_seconds()
    )
}

pub fn clear(production: bool) -> String {
    format!("{}=; {}; Max-Age=0", SESSION_COOKIE, attributes(production))
}

/// Returns the session id carried by the request, if any.
pub fn read(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| c.trim().strip_prefix(prefix.as_str()).map(str::to_string))
        .filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn production_cookie_is_secure_and_cross_site() {
        let cookie = issue("abc", true);
        assert!(cookie.starts_with("launchpad.sid=abc;"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[test]
    fn development_cookie_is_lax() {
        let cookie = issue("abc", false);
        assert!(!cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn reads_the_session_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; launchpad.sid=s-1; lang=en"),
        );
        assert_eq!(read(&headers).as_deref(), Some("s-1"));
    }

    #[test]
    fn cleared_cookie_reads_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("launchpad.sid="));
        assert_eq!(read(&headers), None);
    }
}
