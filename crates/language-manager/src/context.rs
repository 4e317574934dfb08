//! Presentation context: active language, text direction, and RTL set.

use serde::Serialize;

use crate::languages::Language;
use crate::state::AppState;

/// Text direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Template variables describing the active language.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageContext {
    #[serde(rename = "LANGUAGE_CODE")]
    pub language_code: String,
    /// True when the active language is right-to-left.
    #[serde(rename = "LANGUAGE_BIDI")]
    pub language_bidi: bool,
    #[serde(rename = "RTL_LANGUAGES")]
    pub rtl_languages: Vec<String>,
    #[serde(rename = "LANGUAGES")]
    pub languages: Vec<Language>,
}

impl LanguageContext {
    pub fn new(state: &AppState, language: &str) -> Self {
        Self {
            language_code: language.to_string(),
            language_bidi: state.rtl_languages().contains(language),
            rtl_languages: rtl_languages(state).to_vec(),
            languages: state.languages().iter().cloned().collect(),
        }
    }

    pub fn direction(&self) -> Direction {
        if self.language_bidi {
            Direction::Rtl
        } else {
            Direction::Ltr
        }
    }
}

/// The configured RTL language codes, empty if none are configured.
pub fn rtl_languages(state: &AppState) -> &[String] {
    state.rtl_languages().as_slice()
}

/// Inject language variables into a Tera context.
///
/// Adds: `LANGUAGE_CODE`, `LANGUAGE_BIDI`, `LANGUAGE_DIR`, `RTL_LANGUAGES`, `LANGUAGES`
pub fn inject_language_context(state: &AppState, language: &str, context: &mut tera::Context) {
    let lang = LanguageContext::new(state, language);
    context.insert("LANGUAGE_DIR", &lang.direction());
    context.insert("LANGUAGE_CODE", &lang.language_code);
    context.insert("LANGUAGE_BIDI", &lang.language_bidi);
    context.insert("RTL_LANGUAGES", &lang.rtl_languages);
    context.insert("LANGUAGES", &lang.languages);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state(rtl: Option<&str>) -> AppState {
        let config = Config::from_vars(|key| match key {
            "LANGUAGES" => Some("en:English,ar:Arabic,ur:Urdu".to_string()),
            "RTL_LANGUAGES" => rtl.map(str::to_string),
            _ => None,
        })
        .unwrap();
        AppState::new(&config).unwrap()
    }

    #[test]
    fn rtl_set_is_empty_when_unconfigured() {
        assert!(rtl_languages(&state(None)).is_empty());
    }

    #[test]
    fn bidi_follows_active_language() {
        let s = state(Some("ar,ur"));
        let ar = LanguageContext::new(&s, "ar");
        assert!(ar.language_bidi);
        assert_eq!(ar.direction(), Direction::Rtl);
        let en = LanguageContext::new(&s, "en");
        assert!(!en.language_bidi);
        assert_eq!(en.direction(), Direction::Ltr);
        assert_eq!(en.rtl_languages, vec!["ar".to_string(), "ur".to_string()]);
    }

    #[test]
    fn context_serializes_with_template_names() {
        let value = serde_json::to_value(LanguageContext::new(&state(Some("ar")), "ar")).unwrap();
        assert_eq!(value["LANGUAGE_CODE"], "ar");
        assert_eq!(value["LANGUAGE_BIDI"], true);
        assert_eq!(value["RTL_LANGUAGES"][0], "ar");
        assert_eq!(value["LANGUAGES"][2]["code"], "ur");
    }

    #[test]
    fn injects_into_tera() {
        let mut ctx = tera::Context::new();
        inject_language_context(&state(Some("ar")), "ar", &mut ctx);
        let html = tera::Tera::one_off(
            r#"<html dir="{{ LANGUAGE_DIR }}" lang="{{ LANGUAGE_CODE }}">{% for l in LANGUAGES %}{{ l.code }};{% endfor %}"#,
            &ctx,
            false,
        )
        .unwrap();
        assert_eq!(html, r#"<html dir="rtl" lang="ar">en;ar;ur;"#);
    }
}
