//! Application state shared across all handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Config;
use crate::cookie::LanguageCookieConfig;
use crate::languages::{RtlLanguages, SupportedLanguages};
use crate::negotiation::LanguageResolver;
use crate::translate::{PathTranslator, RouteTable};

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap. Everything inside is
/// read-only after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    resolver: LanguageResolver,
    rtl_languages: RtlLanguages,
    cookie: LanguageCookieConfig,
    api_path_prefix: String,
    translator: Arc<dyn PathTranslator>,
}

impl AppState {
    /// Build state from configuration, loading the route table if one is
    /// configured. Without a route table only the landing routes translate.
    pub fn new(config: &Config) -> Result<Self> {
        let translator: Arc<dyn PathTranslator> = match &config.routes_file {
            Some(path) => {
                let table = RouteTable::from_toml_file(config.languages.clone(), path)
                    .with_context(|| format!("failed to load route table {}", path.display()))?;
                info!(
                    path = %path.display(),
                    routes = table.routes().len(),
                    "route table loaded"
                );
                Arc::new(table)
            }
            None => Arc::new(RouteTable::new(config.languages.clone()).route("/")?),
        };

        Ok(Self::with_translator(config, translator))
    }

    /// Build state with a host-supplied path translator.
    pub fn with_translator(config: &Config, translator: Arc<dyn PathTranslator>) -> Self {
        let resolver = LanguageResolver::new(
            config.languages.clone(),
            config.default_language.clone(),
            config.accept_language_matching,
        );

        Self {
            inner: Arc::new(AppStateInner {
                resolver,
                rtl_languages: config.rtl_languages.clone(),
                cookie: config.cookie.clone(),
                api_path_prefix: config.api_path_prefix.clone(),
                translator,
            }),
        }
    }

    pub fn resolver(&self) -> &LanguageResolver {
        &self.inner.resolver
    }

    pub fn languages(&self) -> &SupportedLanguages {
        self.inner.resolver.languages()
    }

    pub fn default_language(&self) -> &str {
        self.inner.resolver.default_language()
    }

    pub fn rtl_languages(&self) -> &RtlLanguages {
        &self.inner.rtl_languages
    }

    pub fn cookie(&self) -> &LanguageCookieConfig {
        &self.inner.cookie
    }

    pub fn api_path_prefix(&self) -> &str {
        &self.inner.api_path_prefix
    }

    pub fn translator(&self) -> &dyn PathTranslator {
        self.inner.translator.as_ref()
    }

    /// Whether a path falls under the API prefix.
    ///
    /// `/api/` also covers the bare `/api`.
    pub fn is_api_path(&self, path: &str) -> bool {
        let prefix = self.api_path_prefix();
        path.starts_with(prefix) || prefix.strip_suffix('/').is_some_and(|bare| path == bare)
    }
}
