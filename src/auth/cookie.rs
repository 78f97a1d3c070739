//! Session cookie issuance, removal and extraction.

use axum::http::{header, HeaderMap, HeaderValue};
use cookie::{time::Duration, Cookie, SameSite};

pub const SESSION_COOKIE_NAME: &str = "session-token";

/// `Set-Cookie` value carrying a freshly issued token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> HeaderValue {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(max_age_secs))
        .path("/")
        .build();
    to_header(&cookie)
}

/// `Set-Cookie` value that removes the session cookie.
pub fn removal_cookie() -> HeaderValue {
    let mut cookie = Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build();
    cookie.make_removal();
    to_header(&cookie)
}

/// Session token from the request's `Cookie` headers, if any.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
}

fn to_header(cookie: &Cookie<'_>) -> HeaderValue {
    // Cookie names and token characters are always valid header bytes.
    HeaderValue::from_str(&cookie.to_string()).unwrap_or_else(|_| HeaderValue::from_static(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let value = session_cookie("abc.def.ghi", 86400, false);
        let value = value.to_str().unwrap();

        assert!(value.starts_with("session-token=abc.def.ghi"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
        assert!(value.contains("Path=/"));
        assert!(value.contains("Max-Age=86400"));
        assert!(!value.contains("Secure"));

        let secure = session_cookie("t", 86400, true);
        assert!(secure.to_str().unwrap().contains("Secure"));
    }

    #[test]
    fn test_removal_cookie() {
        let value = removal_cookie();
        let value = value.to_str().unwrap();
        assert!(value.starts_with("session-token=;"));
        assert!(value.contains("Max-Age=0"));
    }

    #[test]
    fn test_extracts_token_among_cookies() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session-token=tok123; lang=ja"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("tok123"));
    }
}
