//! Language persistence cookie.

use axum::http::header::{COOKIE, InvalidHeaderValue};
use axum::http::{HeaderMap, HeaderValue};
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::{Cookie, SameSite};

/// Attributes of the cookie that remembers the chosen language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageCookieConfig {
    pub name: String,
    /// Max-Age in seconds. `None` yields a browser-session cookie.
    pub max_age: Option<i64>,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<SameSite>,
}

impl Default for LanguageCookieConfig {
    fn default() -> Self {
        Self {
            name: "language".to_string(),
            max_age: None,
            path: "/".to_string(),
            domain: None,
            secure: false,
            http_only: false,
            same_site: None,
        }
    }
}

impl LanguageCookieConfig {
    /// Build the cookie carrying `language`.
    pub fn build(&self, language: &str) -> Cookie<'static> {
        let mut cookie = Cookie::new(self.name.clone(), language.to_string());
        cookie.set_path(self.path.clone());
        if let Some(age) = self.max_age {
            cookie.set_max_age(Duration::seconds(age));
        }
        if let Some(domain) = &self.domain {
            cookie.set_domain(domain.clone());
        }
        cookie.set_secure(self.secure);
        cookie.set_http_only(self.http_only);
        cookie.set_same_site(self.same_site);
        cookie
    }

    /// Render the `Set-Cookie` header value for `language`.
    pub fn header_value(&self, language: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&self.build(language).to_string())
    }
}

/// Parse a `lax`/`strict`/`none` policy name.
pub fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_lowercase().as_str() {
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

/// Read a cookie value by name from all `Cookie` request headers.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw.to_string()))
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
