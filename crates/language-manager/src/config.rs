//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use tower_sessions::cookie::SameSite;

use crate::cookie::{LanguageCookieConfig, parse_same_site};
use crate::languages::{RtlLanguages, SupportedLanguages};
use crate::negotiation::AcceptLanguageMatching;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Supported languages in declaration order (`LANGUAGES`, default: `en:English`).
    pub languages: SupportedLanguages,

    /// Fallback language (`LANGUAGE_CODE`, default: first of `LANGUAGES`).
    pub default_language: String,

    /// Right-to-left languages (`RTL_LANGUAGES`, default: none).
    pub rtl_languages: RtlLanguages,

    /// Attributes of the language persistence cookie (`LANGUAGE_COOKIE_*`).
    pub cookie: LanguageCookieConfig,

    /// Path prefix that selects header-based API activation (default: `/api/`).
    pub api_path_prefix: String,

    /// How Accept-Language codes are matched (default: exact).
    pub accept_language_matching: AcceptLanguageMatching,

    /// Optional TOML route table (`LANGUAGE_ROUTES_FILE`).
    pub routes_file: Option<PathBuf>,

    /// Directories scanned by `compile-translations` (default: `./locale`).
    pub locale_paths: Vec<PathBuf>,

    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Redis URL for sessions. When unset, sessions are kept in memory.
    pub redis_url: Option<String>,

    /// Whether the session cookie requires HTTPS (default: true).
    pub session_cookie_secure: bool,

    /// Session cookie SameSite policy (`COOKIE_SAME_SITE`, default: strict).
    pub session_cookie_same_site: SameSite,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let languages = SupportedLanguages::parse(
            &var("LANGUAGES").unwrap_or_else(|| "en:English".to_string()),
        )
        .context("LANGUAGES must be a non-empty `code:Name` list")?;

        let default_language = match var("LANGUAGE_CODE") {
            Some(code) => {
                let code = code.trim().to_string();
                if !languages.contains(&code) {
                    bail!("LANGUAGE_CODE {code} is not listed in LANGUAGES");
                }
                code
            }
            None => languages.first().code.clone(),
        };

        let rtl_languages = RtlLanguages::new(
            var("RTL_LANGUAGES")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            &languages,
        );

        let cookie = LanguageCookieConfig {
            name: var("LANGUAGE_COOKIE_NAME").unwrap_or_else(|| "language".to_string()),
            max_age: var("LANGUAGE_COOKIE_AGE")
                .map(|v| v.trim().parse::<i64>())
                .transpose()
                .context("LANGUAGE_COOKIE_AGE must be an integer number of seconds")?,
            path: var("LANGUAGE_COOKIE_PATH").unwrap_or_else(|| "/".to_string()),
            domain: var("LANGUAGE_COOKIE_DOMAIN").filter(|d| !d.trim().is_empty()),
            secure: parse_bool(var("LANGUAGE_COOKIE_SECURE"), false)
                .context("LANGUAGE_COOKIE_SECURE must be a boolean")?,
            http_only: parse_bool(var("LANGUAGE_COOKIE_HTTPONLY"), false)
                .context("LANGUAGE_COOKIE_HTTPONLY must be a boolean")?,
            same_site: match var("LANGUAGE_COOKIE_SAMESITE") {
                Some(v) if !v.trim().is_empty() => Some(parse_same_site(&v).ok_or_else(|| {
                    anyhow!("LANGUAGE_COOKIE_SAMESITE must be lax, strict, or none")
                })?),
                _ => None,
            },
        };

        let api_path_prefix = var("API_PATH_PREFIX").unwrap_or_else(|| "/api/".to_string());
        if !api_path_prefix.starts_with('/') {
            bail!("API_PATH_PREFIX must start with '/'");
        }

        let accept_language_matching = match var("ACCEPT_LANGUAGE_MATCHING") {
            Some(v) => v.parse().map_err(|e: String| anyhow!(e))?,
            None => AcceptLanguageMatching::default(),
        };

        let routes_file = var("LANGUAGE_ROUTES_FILE").map(PathBuf::from);

        let locale_paths = var("LOCALE_PATHS")
            .map(|v| split_list(&v).into_iter().map(PathBuf::from).collect())
            .filter(|paths: &Vec<PathBuf>| !paths.is_empty())
            .unwrap_or_else(|| vec![PathBuf::from("./locale")]);

        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let redis_url = var("REDIS_URL").filter(|u| !u.trim().is_empty());

        let session_cookie_secure = parse_bool(var("SESSION_COOKIE_SECURE"), true)
            .context("SESSION_COOKIE_SECURE must be a boolean")?;

        let session_cookie_same_site = var("COOKIE_SAME_SITE")
            .and_then(|v| parse_same_site(&v))
            .unwrap_or(SameSite::Strict);

        Ok(Self {
            languages,
            default_language,
            rtl_languages,
            cookie,
            api_path_prefix,
            accept_language_matching,
            routes_file,
            locale_paths,
            port,
            redis_url,
            session_cookie_secure,
            session_cookie_same_site,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(value: Option<String>, default: bool) -> Result<bool> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("invalid boolean: {other}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.default_language, "en");
        assert_eq!(config.languages.len(), 1);
        assert!(config.rtl_languages.is_empty());
        assert_eq!(config.cookie, LanguageCookieConfig::default());
        assert_eq!(config.api_path_prefix, "/api/");
        assert_eq!(config.accept_language_matching, AcceptLanguageMatching::Exact);
        assert_eq!(config.locale_paths, vec![PathBuf::from("./locale")]);
        assert_eq!(config.port, 3000);
        assert!(config.redis_url.is_none());
        assert!(config.session_cookie_secure);
        assert_eq!(config.session_cookie_same_site, SameSite::Strict);
    }

    #[test]
    fn full_cookie_configuration() {
        let config = load(&[
            ("LANGUAGES", "en:English,ar:Arabic,ur:Urdu"),
            ("LANGUAGE_CODE", "ar"),
            ("RTL_LANGUAGES", "ar, ur"),
            ("LANGUAGE_COOKIE_NAME", "lang"),
            ("LANGUAGE_COOKIE_AGE", "86400"),
            ("LANGUAGE_COOKIE_PATH", "/site"),
            ("LANGUAGE_COOKIE_DOMAIN", "example.com"),
            ("LANGUAGE_COOKIE_SECURE", "true"),
            ("LANGUAGE_COOKIE_HTTPONLY", "1"),
            ("LANGUAGE_COOKIE_SAMESITE", "Lax"),
            ("ACCEPT_LANGUAGE_MATCHING", "primary-subtag"),
            ("LOCALE_PATHS", "locale, other/locale"),
        ])
        .unwrap();

        assert_eq!(config.default_language, "ar");
        assert_eq!(
            config.rtl_languages.as_slice(),
            &["ar".to_string(), "ur".to_string()]
        );
        assert_eq!(
            config.cookie,
            LanguageCookieConfig {
                name: "lang".to_string(),
                max_age: Some(86400),
                path: "/site".to_string(),
                domain: Some("example.com".to_string()),
                secure: true,
                http_only: true,
                same_site: Some(SameSite::Lax),
            }
        );
        assert_eq!(
            config.accept_language_matching,
            AcceptLanguageMatching::PrimarySubtag
        );
        assert_eq!(config.locale_paths.len(), 2);
    }

    #[test]
    fn default_language_must_be_supported() {
        let err = load(&[("LANGUAGES", "en,ar"), ("LANGUAGE_CODE", "fr")]).unwrap_err();
        assert!(err.to_string().contains("LANGUAGE_CODE"));
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(load(&[("LANGUAGE_COOKIE_AGE", "forever")]).is_err());
        assert!(load(&[("LANGUAGE_COOKIE_SECURE", "maybe")]).is_err());
        assert!(load(&[("LANGUAGE_COOKIE_SAMESITE", "sometimes")]).is_err());
        assert!(load(&[("ACCEPT_LANGUAGE_MATCHING", "fuzzy")]).is_err());
        assert!(load(&[("API_PATH_PREFIX", "api")]).is_err());
        assert!(load(&[("LANGUAGES", "")]).is_err());
    }
}
