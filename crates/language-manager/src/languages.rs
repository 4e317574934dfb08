//! Supported and right-to-left language sets.
//!
//! Both sets are process-wide configuration: built once at startup and
//! shared read-only across requests.

use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

/// A configured language: code plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

/// Errors building a [`SupportedLanguages`] set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageSetError {
    #[error("at least one language must be configured")]
    Empty,

    #[error("duplicate language code: {0}")]
    Duplicate(String),

    #[error("empty language code")]
    EmptyCode,
}

/// Ordered set of supported languages.
///
/// Declaration order is preserved for UI listing. Membership checks use a
/// HashSet so validation stays O(1) on the request path.
#[derive(Debug, Clone)]
pub struct SupportedLanguages {
    languages: Vec<Language>,
    codes: HashSet<String>,
}

impl SupportedLanguages {
    /// Build from `(code, display name)` pairs in declaration order.
    pub fn new<I, C, N>(pairs: I) -> Result<Self, LanguageSetError>
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let mut languages = Vec::new();
        let mut codes = HashSet::new();

        for (code, name) in pairs {
            let code = code.into();
            if code.is_empty() {
                return Err(LanguageSetError::EmptyCode);
            }
            if !codes.insert(code.clone()) {
                return Err(LanguageSetError::Duplicate(code));
            }
            languages.push(Language {
                code,
                name: name.into(),
            });
        }

        if languages.is_empty() {
            return Err(LanguageSetError::Empty);
        }

        Ok(Self { languages, codes })
    }

    /// Parse the `code:Name,code:Name` format used by the `LANGUAGES` variable.
    ///
    /// A bare `code` without a name uses the code as its display name.
    pub fn parse(value: &str) -> Result<Self, LanguageSetError> {
        let pairs = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|entry| match entry.split_once(':') {
                Some((code, name)) => (code.trim().to_string(), name.trim().to_string()),
                None => (entry.to_string(), entry.to_string()),
            });
        Self::new(pairs)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// First declared language, used when no default is configured.
    pub fn first(&self) -> &Language {
        // Non-empty is enforced by the constructor.
        &self.languages[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Language> {
        self.languages.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}

/// Languages written right-to-left.
#[derive(Debug, Clone, Default)]
pub struct RtlLanguages {
    codes: Vec<String>,
}

impl RtlLanguages {
    /// Keep only codes that are also supported, in the given order.
    pub fn new<I, C>(codes: I, supported: &SupportedLanguages) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into();
            if !supported.contains(&code) {
                tracing::warn!(code = %code, "RTL language is not a supported language, ignoring");
                continue;
            }
            if !kept.contains(&code) {
                kept.push(code);
            }
        }
        Self { codes: kept }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.codes
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
