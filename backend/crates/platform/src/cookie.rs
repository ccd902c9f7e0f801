//! Cookie Management Infrastructure
//!
//! Reading `Cookie` request headers and building `Set-Cookie` values.

use http::header::{self, InvalidHeaderValue};
use http::{HeaderMap, HeaderValue};

/// Expiry used when a cookie is being deleted
const EPOCH_EXPIRES: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// SameSite policy for cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes shared by every cookie written under one name
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "session".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
        }
    }
}

impl CookieConfig {
    /// Build a `Set-Cookie` value.
    ///
    /// `max_age_secs = None` produces a browser-session cookie (no `Max-Age`).
    pub fn build_set_cookie(&self, value: &str, max_age_secs: Option<i64>) -> String {
        let mut cookie = format!("{}={}", self.name, value);
        self.push_attributes(&mut cookie);

        if let Some(max_age) = max_age_secs {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }

        cookie
    }

    /// Build a `Set-Cookie` value that makes the client drop the cookie
    pub fn build_delete_cookie(&self) -> String {
        let mut cookie = format!("{}=", self.name);
        self.push_attributes(&mut cookie);
        cookie.push_str("; Max-Age=0");
        cookie.push_str(&format!("; Expires={}", EPOCH_EXPIRES));
        cookie
    }

    fn push_attributes(&self, cookie: &mut String) {
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie.push_str(&format!("; SameSite={}", self.same_site.as_str()));
        cookie.push_str(&format!("; Path={}", self.path));
    }
}

/// Extract a cookie value from request headers.
///
/// Looks through every `Cookie` header; the first pair with a matching name wins.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (key, value) = pair.trim().split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

/// Append a `Set-Cookie` header to a response header map
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), InvalidHeaderValue> {
    let value = HeaderValue::from_str(cookie)?;
    headers.append(header::SET_COOKIE, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CookieConfig {
        CookieConfig {
            name: "sid".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Strict,
            path: "/app".to_string(),
        }
    }

    #[test]
    fn test_build_set_cookie_with_max_age() {
        let cookie = config().build_set_cookie("value123", Some(3600));
        assert!(cookie.starts_with("sid=value123"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/app"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_build_set_cookie_without_max_age() {
        let cookie = config().build_set_cookie("v", None);
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn test_build_delete_cookie() {
        let cookie = config().build_delete_cookie();
        assert!(cookie.starts_with("sid=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(cookie.contains("Path=/app"));
    }

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("foo=bar; session=abc123; other=xyz"),
        );

        assert_eq!(
            extract_cookie(&headers, "session"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_cookie(&headers, "foo"), Some("bar".to_string()));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("sid=tok.sig"));

        assert_eq!(extract_cookie(&headers, "sid"), Some("tok.sig".to_string()));
    }

    #[test]
    fn test_append_set_cookie() {
        let mut headers = HeaderMap::new();
        append_set_cookie(&mut headers, "a=1").unwrap();
        append_set_cookie(&mut headers, "b=2").unwrap();
        assert_eq!(headers.get_all(header::SET_COOKIE).iter().count(), 2);

        assert!(append_set_cookie(&mut headers, "bad\nvalue").is_err());
    }
}
