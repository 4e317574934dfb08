//! URL translation between language-prefixed route variants.
//!
//! A [`PathTranslator`] maps a request path to the equivalent path in another
//! language. [`RouteTable`] is the bundled implementation: language-agnostic
//! route patterns plus optional per-language slug translations.

use std::collections::HashMap;
use std::path::Path;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::Deserialize;
use thiserror::Error;

use crate::languages::SupportedLanguages;
use crate::negotiation::split_language_prefix;

/// Translates a path into its equivalent for another language.
pub trait PathTranslator: Send + Sync {
    /// Returns `None` if the path maps to no known route or the route has no
    /// equivalent in `language`.
    fn translate_path(&self, path: &str, language: &str) -> Option<String>;
}

/// Landing path for a language, used when translation fails.
pub fn landing_path(language: &str) -> String {
    format!("/{language}/")
}

/// URL of the current page in another language, or its landing path.
pub fn change_language_url(
    translator: &dyn PathTranslator,
    full_path: &str,
    language: &str,
) -> String {
    translator
        .translate_path(full_path, language)
        .unwrap_or_else(|| landing_path(language))
}

/// Bytes escaped when turning an IRI into a URI. `%` and the reserved
/// delimiters pass through, so already-encoded input is left as is.
const IRI_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encode the non-ASCII and unsafe bytes of a URL reference.
pub fn iri_to_uri(iri: &str) -> String {
    utf8_percent_encode(iri, IRI_ESCAPE).to_string()
}

/// Route table errors.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern: {0}")]
    InvalidPattern(String),

    #[error("slug translations for unsupported language: {0}")]
    UnknownLanguage(String),

    #[error("language {language} maps two slugs to {localized}")]
    AmbiguousSlug { language: String, localized: String },

    #[error("invalid route file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read route file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

/// A language-agnostic route such as `/jobs/{id}/`.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    pattern: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let (raw, trailing_slash) = split_segments(pattern)
            .ok_or_else(|| RouteError::InvalidPattern(pattern.to_string()))?;
        let segments = raw
            .into_iter()
            .map(|s| {
                if s.starts_with('{') && s.ends_with('}') && s.len() > 2 {
                    Segment::Param
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Ok(Self {
            pattern: pattern.to_string(),
            segments,
            trailing_slash,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    fn matches(&self, segments: &[String], trailing_slash: bool) -> bool {
        self.trailing_slash == trailing_slash
            && self.segments.len() == segments.len()
            && self.segments.iter().zip(segments).all(|(p, s)| match p {
                Segment::Literal(lit) => lit == s,
                Segment::Param => true,
            })
    }
}

/// Split a path into raw segments and a trailing-slash flag.
///
/// The root path has no segments and counts as slash-terminated. Empty
/// interior segments (`//`) make the path unroutable.
fn split_segments(path: &str) -> Option<(Vec<&str>, bool)> {
    let body = path.strip_prefix('/')?;
    if body.is_empty() {
        return Some((Vec::new(), true));
    }
    let (body, trailing_slash) = match body.strip_suffix('/') {
        Some(b) => (b, true),
        None => (body, false),
    };
    let segments: Vec<&str> = body.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some((segments, trailing_slash))
}

#[derive(Debug, Clone, Default)]
struct SlugMap {
    /// canonical → localized
    localize: HashMap<String, String>,
    /// localized → canonical
    delocalize: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RouteFile {
    routes: Vec<String>,
    #[serde(default)]
    slugs: HashMap<String, HashMap<String, String>>,
}

/// Language-agnostic routes with per-language slug translations.
#[derive(Debug, Clone)]
pub struct RouteTable {
    languages: SupportedLanguages,
    routes: Vec<RoutePattern>,
    slugs: HashMap<String, SlugMap>,
}

impl RouteTable {
    pub fn new(languages: SupportedLanguages) -> Self {
        Self {
            languages,
            routes: Vec::new(),
            slugs: HashMap::new(),
        }
    }

    /// Register a route pattern. Earlier routes win on overlap.
    pub fn route(mut self, pattern: &str) -> Result<Self, RouteError> {
        self.routes.push(RoutePattern::parse(pattern)?);
        Ok(self)
    }

    /// Translate the literal segment `canonical` to `localized` in `language`.
    pub fn slug(mut self, language: &str, canonical: &str, localized: &str) -> Result<Self, RouteError> {
        if !self.languages.contains(language) {
            return Err(RouteError::UnknownLanguage(language.to_string()));
        }
        let map = self.slugs.entry(language.to_string()).or_default();
        if let Some(existing) = map.delocalize.get(localized)
            && existing != canonical
        {
            return Err(RouteError::AmbiguousSlug {
                language: language.to_string(),
                localized: localized.to_string(),
            });
        }
        map.localize
            .insert(canonical.to_string(), localized.to_string());
        map.delocalize
            .insert(localized.to_string(), canonical.to_string());
        Ok(self)
    }

    /// Load routes and slugs from TOML:
    ///
    /// ```toml
    /// routes = ["/", "/jobs/", "/jobs/{id}/"]
    ///
    /// [slugs.ar]
    /// jobs = "wazaif"
    /// ```
    pub fn from_toml_str(languages: SupportedLanguages, source: &str) -> Result<Self, RouteError> {
        let file: RouteFile = toml::from_str(source)?;
        let mut table = Self::new(languages);
        for pattern in &file.routes {
            table = table.route(pattern)?;
        }
        for (language, slugs) in &file.slugs {
            for (canonical, localized) in slugs {
                table = table.slug(language, canonical, localized)?;
            }
        }
        Ok(table)
    }

    pub fn from_toml_file(languages: SupportedLanguages, path: &Path) -> Result<Self, RouteError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(languages, &source)
    }

    pub fn routes(&self) -> &[RoutePattern] {
        &self.routes
    }

    fn delocalize(&self, language: Option<&str>, segment: String) -> String {
        language
            .and_then(|l| self.slugs.get(l))
            .and_then(|m| m.delocalize.get(&segment))
            .cloned()
            .unwrap_or(segment)
    }

    fn localize<'a>(&'a self, language: &str, canonical: &'a str) -> &'a str {
        self.slugs
            .get(language)
            .and_then(|m| m.localize.get(canonical))
            .map_or(canonical, String::as_str)
    }
}

impl PathTranslator for RouteTable {
    fn translate_path(&self, path: &str, language: &str) -> Option<String> {
        if !self.languages.contains(language) {
            return None;
        }

        let path = path.split('#').next().unwrap_or(path);
        let (path, query) = match path.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (path, None),
        };

        let (source_language, rest) = match split_language_prefix(path, &self.languages) {
            Some((lang, rest)) => (Some(lang), rest),
            None => (None, path),
        };

        let (raw, trailing_slash) = split_segments(rest)?;
        let mut segments = Vec::with_capacity(raw.len());
        for segment in raw {
            let decoded = urlencoding::decode(segment).ok()?.into_owned();
            segments.push(self.delocalize(source_language, decoded));
        }

        let route = self
            .routes
            .iter()
            .find(|r| r.matches(&segments, trailing_slash))?;

        let mut translated = format!("/{language}");
        for (pattern, value) in route.segments.iter().zip(&segments) {
            let out = match pattern {
                Segment::Literal(lit) => self.localize(language, lit),
                Segment::Param => value.as_str(),
            };
            translated.push('/');
            translated.push_str(&urlencoding::encode(out));
        }
        if trailing_slash {
            translated.push('/');
        }
        if let Some(query) = query {
            translated.push('?');
            translated.push_str(query);
        }

        tracing::debug!(
            from = %path,
            to = %translated,
            route = %route.as_str(),
            "translated path"
        );
        Some(translated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn languages() -> SupportedLanguages {
        SupportedLanguages::parse("en:English,ar:Arabic,ur:Urdu").unwrap()
    }

    fn table() -> RouteTable {
        RouteTable::new(languages())
            .route("/")
            .unwrap()
            .route("/jobs/")
            .unwrap()
            .route("/jobs/{id}/")
            .unwrap()
            .route("/about")
            .unwrap()
            .slug("ar", "jobs", "wazaif")
            .unwrap()
    }

    #[test]
    fn iri_to_uri_encodes_only_unsafe_bytes() {
        assert_eq!(iri_to_uri("/ar/wazaif/?q=وظائف"), "/ar/wazaif/?q=%D9%88%D8%B8%D8%A7%D8%A6%D9%81");
        assert_eq!(iri_to_uri("/en/?a=1&b=%20x#top"), "/en/?a=1&b=%20x#top");
        assert_eq!(iri_to_uri("/a b\n"), "/a%20b%0A");
    }

    #[test]
    fn prefix_swapped_for_plain_route() {
        assert_eq!(
            table().translate_path("/en/jobs/", "ur").as_deref(),
            Some("/ur/jobs/")
        );
    }

    #[test]
    fn round_trip_through_localized_slug() {
        let t = table();
        let ar = t.translate_path("/en/jobs/42/", "ar").unwrap();
        assert_eq!(ar, "/ar/wazaif/42/");
        assert_eq!(t.translate_path(&ar, "en").as_deref(), Some("/en/jobs/42/"));
    }

    #[test]
    fn unprefixed_path_gains_prefix() {
        assert_eq!(
            table().translate_path("/jobs/7/", "ar").as_deref(),
            Some("/ar/wazaif/7/")
        );
    }

    #[test]
    fn root_translates_to_landing() {
        assert_eq!(table().translate_path("/", "ar").as_deref(), Some("/ar/"));
        assert_eq!(table().translate_path("/en/", "ar").as_deref(), Some("/ar/"));
        assert_eq!(table().translate_path("/en", "ar").as_deref(), Some("/ar/"));
    }

    #[test]
    fn query_string_preserved() {
        assert_eq!(
            table().translate_path("/en/jobs/?page=2&q=rust", "ar").as_deref(),
            Some("/ar/wazaif/?page=2&q=rust")
        );
    }

    #[test]
    fn trailing_slash_must_match() {
        let t = table();
        assert_eq!(t.translate_path("/en/about", "ar").as_deref(), Some("/ar/about"));
        assert_eq!(t.translate_path("/en/about/", "ar"), None);
        assert_eq!(t.translate_path("/en/jobs/42", "ar"), None);
    }

    #[test]
    fn unroutable_path_fails_and_falls_back() {
        let t = table();
        assert_eq!(t.translate_path("/en/nowhere/", "ar"), None);
        assert_eq!(t.translate_path("not-a-path", "ar"), None);
        assert_eq!(t.translate_path("//evil.example/jobs/", "ar"), None);
        assert_eq!(change_language_url(&t, "/en/nowhere/", "ar"), "/ar/");
    }

    #[test]
    fn unsupported_target_is_a_failure() {
        assert_eq!(table().translate_path("/en/jobs/", "xx"), None);
    }

    #[test]
    fn non_ascii_slugs_are_percent_encoded() {
        let t = RouteTable::new(languages())
            .route("/jobs/")
            .unwrap()
            .slug("ar", "jobs", "وظائف")
            .unwrap();
        let ar = t.translate_path("/en/jobs/", "ar").unwrap();
        assert!(ar.is_ascii());
        assert_eq!(ar, format!("/ar/{}/", urlencoding::encode("وظائف")));
        assert_eq!(t.translate_path(&ar, "en").as_deref(), Some("/en/jobs/"));
    }

    #[test]
    fn slug_for_unknown_language_rejected() {
        let err = RouteTable::new(languages()).slug("fr", "jobs", "emplois").unwrap_err();
        assert!(matches!(err, RouteError::UnknownLanguage(l) if l == "fr"));
    }

    #[test]
    fn ambiguous_slug_rejected() {
        let err = RouteTable::new(languages())
            .slug("ar", "jobs", "x")
            .unwrap()
            .slug("ar", "news", "x")
            .unwrap_err();
        assert!(matches!(err, RouteError::AmbiguousSlug { .. }));
    }

    #[test]
    fn loads_from_toml() {
        let source = r#"
            routes = ["/", "/jobs/{id}/"]

            [slugs.ur]
            jobs = "naukri"
        "#;
        let t = RouteTable::from_toml_str(languages(), source).unwrap();
        assert_eq!(t.routes().len(), 2);
        assert_eq!(
            t.translate_path("/ar/jobs/3/", "ur").as_deref(),
            Some("/ur/naukri/3/")
        );
    }

    #[test]
    fn invalid_pattern_in_toml_rejected() {
        let err = RouteTable::from_toml_str(languages(), r#"routes = ["jobs"]"#).unwrap_err();
        assert!(matches!(err, RouteError::InvalidPattern(_)));
    }
}
