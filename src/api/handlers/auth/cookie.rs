//! Session cookie handling for the admin token.
//!
//! `SessionCookies` decides what the cookie looks like; a `CookieStore` is
//! where it is read from and written to. Handlers use `HeaderCookies` over the
//! request and response headers, tests use an in-memory store.

use anyhow::{Context, Result};
use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

pub const SESSION_COOKIE_NAME: &str = "admin_jwt_token";

/// Cookie transport seen by the auth handlers.
pub trait CookieStore {
    /// Raw value of a request cookie.
    fn get(&self, name: &str) -> Option<String>;

    /// Queue a `Set-Cookie` value for the response.
    ///
    /// # Errors
    /// Returns an error if the value cannot be carried by the transport.
    fn set(&mut self, cookie: String) -> Result<()>;
}

/// Builds, clears and reads the `admin_jwt_token` cookie.
#[derive(Clone, Debug)]
pub struct SessionCookies {
    secure: bool,
    max_age_seconds: i64,
}

impl SessionCookies {
    #[must_use]
    pub fn new(secure: bool, max_age_seconds: i64) -> Self {
        Self {
            secure,
            max_age_seconds,
        }
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }

    /// Store `token` in the session cookie.
    ///
    /// # Errors
    /// Returns an error if the store rejects the cookie.
    pub fn set(&self, store: &mut dyn CookieStore, token: &str) -> Result<()> {
        store.set(self.session_cookie(token))
    }

    /// Expire the session cookie in the browser.
    ///
    /// # Errors
    /// Returns an error if the store rejects the cookie.
    pub fn clear(&self, store: &mut dyn CookieStore) -> Result<()> {
        store.set(self.cleared_cookie())
    }

    /// Raw token from the request, if a non-empty cookie is present.
    #[must_use]
    pub fn read(&self, store: &dyn CookieStore) -> Option<String> {
        store
            .get(SESSION_COOKIE_NAME)
            .filter(|value| !value.is_empty())
    }

    fn session_cookie(&self, token: &str) -> String {
        let max_age = self.max_age_seconds;
        let mut cookie =
            format!("{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    fn cleared_cookie(&self) -> String {
        let mut cookie =
            format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

/// `CookieStore` over request headers, collecting `Set-Cookie` headers for the response.
pub struct HeaderCookies<'a> {
    request: &'a HeaderMap,
    response: HeaderMap,
}

impl<'a> HeaderCookies<'a> {
    #[must_use]
    pub fn new(request: &'a HeaderMap) -> Self {
        Self {
            request,
            response: HeaderMap::new(),
        }
    }

    /// Headers to attach to the response.
    #[must_use]
    pub fn into_headers(self) -> HeaderMap {
        self.response
    }
}

impl CookieStore for HeaderCookies<'_> {
    fn get(&self, name: &str) -> Option<String> {
        self.request
            .get_all(COOKIE)
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|value| value.split(';'))
            .find_map(|pair| {
                let mut parts = pair.trim().splitn(2, '=');
                let key = parts.next()?.trim();
                let val = parts.next()?.trim();
                (key == name).then(|| val.to_string())
            })
    }

    fn set(&mut self, cookie: String) -> Result<()> {
        let value = HeaderValue::from_str(&cookie).context("invalid Set-Cookie value")?;
        self.response.append(SET_COOKIE, value);
        Ok(())
    }
}

/// In-memory store for exercising handlers without HTTP.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryCookies {
    pub(crate) request: Vec<(String, String)>,
    pub(crate) written: Vec<String>,
}

#[cfg(test)]
impl MemoryCookies {
    pub(crate) fn with_cookie(name: &str, value: &str) -> Self {
        Self {
            request: vec![(name.to_string(), value.to_string())],
            written: Vec::new(),
        }
    }
}

#[cfg(test)]
impl CookieStore for MemoryCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.request
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn set(&mut self, cookie: String) -> Result<()> {
        self.written.push(cookie);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_writes_all_attributes() -> Result<()> {
        let cookies = SessionCookies::new(true, 28_800);
        let mut store = MemoryCookies::default();
        cookies.set(&mut store, "abc.def.ghi")?;

        assert_eq!(
            store.written,
            vec![
                "admin_jwt_token=abc.def.ghi; Path=/; HttpOnly; SameSite=Lax; Max-Age=28800; Secure"
                    .to_string()
            ]
        );
        Ok(())
    }

    #[test]
    fn secure_attribute_only_in_production() -> Result<()> {
        let cookies = SessionCookies::new(false, 60);
        let mut store = MemoryCookies::default();
        cookies.set(&mut store, "token")?;
        cookies.clear(&mut store)?;

        assert!(store.written.iter().all(|cookie| !cookie.contains("Secure")));
        Ok(())
    }

    #[test]
    fn clear_expires_immediately() -> Result<()> {
        let cookies = SessionCookies::new(true, 60);
        let mut store = MemoryCookies::default();
        cookies.clear(&mut store)?;

        assert_eq!(
            store.written,
            vec!["admin_jwt_token=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure".to_string()]
        );
        Ok(())
    }

    #[test]
    fn read_treats_empty_value_as_absent() {
        let cookies = SessionCookies::new(true, 60);
        assert_eq!(cookies.read(&MemoryCookies::default()), None);
        assert_eq!(
            cookies.read(&MemoryCookies::with_cookie(SESSION_COOKIE_NAME, "")),
            None
        );
        assert_eq!(
            cookies.read(&MemoryCookies::with_cookie(SESSION_COOKIE_NAME, "a.b.c")),
            Some("a.b.c".to_string())
        );
    }

    #[test]
    fn header_cookies_finds_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; admin_jwt_token=a.b.c ; lang=ja"),
        );
        let store = HeaderCookies::new(&headers);
        assert_eq!(store.get(SESSION_COOKIE_NAME), Some("a.b.c".to_string()));
        assert_eq!(store.get("lang"), Some("ja".to_string()));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn header_cookies_searches_every_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("admin_jwt_token=x.y.z"));
        let store = HeaderCookies::new(&headers);
        assert_eq!(store.get(SESSION_COOKIE_NAME), Some("x.y.z".to_string()));
    }

    #[test]
    fn header_cookies_collects_set_cookie_headers() -> Result<()> {
        let headers = HeaderMap::new();
        let cookies = SessionCookies::new(false, 60);
        let mut store = HeaderCookies::new(&headers);
        cookies.set(&mut store, "token")?;

        let response = store.into_headers();
        let values: Vec<&str> = response
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        assert_eq!(
            values,
            vec!["admin_jwt_token=token; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"]
        );
        Ok(())
    }

    #[test]
    fn header_cookies_rejects_invalid_header_value() {
        let headers = HeaderMap::new();
        let mut store = HeaderCookies::new(&headers);
        assert!(store.set("bad\nvalue".to_string()).is_err());
        assert!(store.into_headers().is_empty());
    }
}
