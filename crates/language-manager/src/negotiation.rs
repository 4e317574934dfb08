//! Language negotiation.
//!
//! Collects the per-request language signals and resolves them, in a fixed
//! priority order, to one supported language code.
//!
//! Resolution order: explicit override → `X-Language` → `Accept-Language` →
//! cookie → session → URL prefix → default.

use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};

use crate::cookie::read_cookie;
use crate::languages::SupportedLanguages;

/// Custom single-value language header.
pub const X_LANGUAGE: &str = "x-language";

/// The resolved language for the current request.
///
/// Stored in request extensions for per-request access, and usable directly
/// as a handler argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLanguage(pub String);

impl ResolvedLanguage {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for ResolvedLanguage
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedLanguage>()
            .cloned()
            .ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "language middleware is not installed",
            ))
    }
}

/// How `Accept-Language` codes are compared with the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AcceptLanguageMatching {
    /// Exact string comparison only.
    #[default]
    Exact,
    /// Exact first, then the primary subtag (`en-US` → `en`).
    PrimarySubtag,
}

impl FromStr for AcceptLanguageMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "primary-subtag" | "primary_subtag" | "subtag" => Ok(Self::PrimarySubtag),
            other => Err(format!("unknown Accept-Language matching mode: {other}")),
        }
    }
}

/// One language source, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Explicit,
    Header,
    AcceptLanguage,
    Cookie,
    Session,
    UrlPrefix,
}

impl Signal {
    /// Full chain used for page requests and the switch action.
    pub const PAGE: [Signal; 6] = [
        Signal::Explicit,
        Signal::Header,
        Signal::AcceptLanguage,
        Signal::Cookie,
        Signal::Session,
        Signal::UrlPrefix,
    ];

    /// Header-only chain used for API requests.
    pub const API: [Signal; 2] = [Signal::Header, Signal::AcceptLanguage];
}

/// Candidate language indicators gathered from a single request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestLanguageSignals {
    pub explicit: Option<String>,
    pub header: Option<String>,
    /// `Accept-Language` as `(code, quality)` pairs in listed order.
    pub accept_language: Vec<(String, f32)>,
    pub cookie: Option<String>,
    pub session: Option<String>,
    pub url_prefix: Option<String>,
}

impl RequestLanguageSignals {
    /// Read the header and cookie signals from a request's headers.
    ///
    /// Session and URL prefix signals need request context the headers do not
    /// carry; callers fill those in.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let header = headers
            .get(X_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        let accept_language = headers
            .get(axum::http::header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok())
            .map(parse_accept_language)
            .unwrap_or_default();

        Self {
            header,
            accept_language,
            cookie: read_cookie(headers, cookie_name),
            ..Self::default()
        }
    }

    fn candidate(&self, signal: Signal) -> Option<&str> {
        match signal {
            Signal::Explicit => self.explicit.as_deref(),
            Signal::Header => self.header.as_deref(),
            // Only the first listed entry counts; quality does not re-rank.
            Signal::AcceptLanguage => self.accept_language.first().map(|(c, _)| c.as_str()),
            Signal::Cookie => self.cookie.as_deref(),
            Signal::Session => self.session.as_deref(),
            Signal::UrlPrefix => self.url_prefix.as_deref(),
        }
    }
}

/// Parse an `Accept-Language` value into `(code, quality)` pairs.
///
/// Listed order is preserved. A missing or malformed quality defaults to 1.0
/// and is clamped to the RFC 7231 range.
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    header
        .split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }

            let mut segments = part.split(';');
            let code = segments.next()?.trim();
            if code.is_empty() {
                return None;
            }

            let quality = segments
                .find_map(|s| {
                    s.trim()
                        .strip_prefix("q=")
                        .and_then(|q| q.trim().parse::<f32>().ok())
                })
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);

            Some((code.to_string(), quality))
        })
        .collect()
}

/// Resolves request signals to a supported language.
///
/// Pure: holds only read-only configuration and never activates anything.
#[derive(Debug, Clone)]
pub struct LanguageResolver {
    languages: SupportedLanguages,
    default_language: String,
    matching: AcceptLanguageMatching,
}

impl LanguageResolver {
    /// Create a resolver.
    ///
    /// An unsupported `default_language` is replaced by the first supported
    /// language so the resolver can never return an invalid code.
    pub fn new(
        languages: SupportedLanguages,
        default_language: impl Into<String>,
        matching: AcceptLanguageMatching,
    ) -> Self {
        let mut default_language = default_language.into();
        if !languages.contains(&default_language) {
            tracing::warn!(
                default_language = %default_language,
                "default language is not supported, using first configured language"
            );
            default_language = languages.first().code.clone();
        }
        Self {
            languages,
            default_language,
            matching,
        }
    }

    pub fn languages(&self) -> &SupportedLanguages {
        &self.languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.languages.contains(code)
    }

    /// Resolve with the full page chain, falling back to the default.
    pub fn resolve(&self, signals: &RequestLanguageSignals) -> String {
        self.resolve_from(signals, &Signal::PAGE)
            .map(|(_, lang)| lang)
            .unwrap_or_else(|| self.default_language.clone())
    }

    /// Resolve from the headers only. `None` leaves the default active.
    pub fn resolve_headers(&self, signals: &RequestLanguageSignals) -> Option<String> {
        self.resolve_from(signals, &Signal::API).map(|(_, lang)| lang)
    }

    /// Walk `order` and return the first signal yielding a supported code.
    pub fn resolve_from(
        &self,
        signals: &RequestLanguageSignals,
        order: &[Signal],
    ) -> Option<(Signal, String)> {
        for &signal in order {
            let Some(candidate) = signals.candidate(signal) else {
                continue;
            };
            let matched = if signal == Signal::AcceptLanguage {
                self.match_accept_language(candidate)
            } else {
                self.languages.contains(candidate).then_some(candidate)
            };
            match matched {
                Some(lang) => return Some((signal, lang.to_string())),
                None => tracing::debug!(
                    signal = ?signal,
                    candidate = %candidate,
                    "unsupported language candidate, skipping"
                ),
            }
        }
        None
    }

    fn match_accept_language<'a>(&self, code: &'a str) -> Option<&'a str> {
        if self.languages.contains(code) {
            return Some(code);
        }
        if self.matching == AcceptLanguageMatching::PrimarySubtag
            && let Some((primary, _)) = code.split_once('-')
            && self.languages.contains(primary)
        {
            return Some(primary);
        }
        None
    }

    /// Extract a supported language from the first path segment.
    pub fn extract_prefix<'a>(&self, path: &'a str) -> Option<(&'a str, &'a str)> {
        split_language_prefix(path, &self.languages)
    }
}

/// Split a supported language prefix off a path.
///
/// Returns `(language, remaining_path)`. The prefix must be followed by `/`
/// or end the path, so `/enterprise` never matches `en`. Matching is
/// case-sensitive.
pub fn split_language_prefix<'a>(
    path: &'a str,
    languages: &SupportedLanguages,
) -> Option<(&'a str, &'a str)> {
    let trimmed = path.strip_prefix('/')?;

    let (candidate, rest) = match trimmed.find('/') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos..]),
        None => (trimmed, ""),
    };

    if !languages.contains(candidate) {
        return None;
    }

    if rest.is_empty() {
        Some((candidate, "/"))
    } else {
        Some((candidate, rest))
    }
}
