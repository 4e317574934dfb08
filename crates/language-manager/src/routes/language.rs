//! Language switching routes.

use axum::extract::State;
use axum::http::header::{LOCATION, REFERER, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, warn};

use crate::csrf::{generate_csrf_token, verify_csrf_token};
use crate::error::{AppError, AppResult};
use crate::negotiation::{RequestLanguageSignals, Signal};
use crate::session::store_session_language;
use crate::state::AppState;
use crate::translate::{change_language_url, iri_to_uri};

/// Language switch form body.
#[derive(Debug, Deserialize)]
pub struct SetLanguageForm {
    #[serde(default)]
    pub language: Option<String>,
    /// Page to return to after switching.
    #[serde(default)]
    pub next: Option<String>,
    #[serde(rename = "_token", default)]
    pub csrf_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct TokenResponse {
    csrf_token: String,
}

#[derive(Debug, Serialize)]
struct LanguageEntry {
    code: String,
    name: String,
    rtl: bool,
}

#[derive(Debug, Serialize)]
struct LanguagesResponse {
    default: String,
    languages: Vec<LanguageEntry>,
}

/// Switch the active language.
///
/// POST /i18n/setlang/
/// - Rejects a missing or invalid CSRF token with 403 before touching state
/// - Unsupported language: redirect back to the referrer (or `/`), no changes
/// - Supported language: translate `next` (or the referrer) into the new
///   language, store it in the session and the language cookie, redirect
async fn set_language(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<SetLanguageForm>,
) -> AppResult<Response> {
    let token = form.csrf_token.as_deref().unwrap_or_default();
    match verify_csrf_token(&session, token).await {
        Ok(true) => {}
        Ok(false) => {
            warn!("language switch rejected: invalid CSRF token");
            return Err(AppError::Forbidden);
        }
        Err(e) => {
            warn!(error = %e, "language switch rejected");
            return Err(AppError::Forbidden);
        }
    }

    let referer = headers
        .get(REFERER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty());

    // The form value is the only signal; an unsupported one never falls
    // through to the rest of the chain.
    let signals = RequestLanguageSignals {
        explicit: form.language.clone(),
        ..RequestLanguageSignals::default()
    };
    let Some((_, language)) = state.resolver().resolve_from(&signals, &[Signal::Explicit]) else {
        warn!(
            language = ?form.language,
            "unsupported language requested, redirecting back"
        );
        return Ok(found(referer.unwrap_or("/")));
    };

    let next = form
        .next
        .as_deref()
        .filter(|n| !n.is_empty())
        .or(referer)
        .unwrap_or("/");
    let target = change_language_url(state.translator(), &local_path(next), &language);

    store_session_language(&session, &language).await?;

    let cookie = state
        .cookie()
        .header_value(&language)
        .map_err(|e| anyhow::anyhow!("invalid language cookie: {e}"))?;

    info!(language = %language, target = %target, "language switched");

    let mut response = found(&target);
    response.headers_mut().append(SET_COOKIE, cookie);
    Ok(response)
}

/// Issue a CSRF token for the language switch form.
///
/// GET /i18n/token
async fn csrf_token(session: Session) -> AppResult<Json<TokenResponse>> {
    let csrf_token = generate_csrf_token(&session).await?;
    Ok(Json(TokenResponse { csrf_token }))
}

/// List supported languages in declaration order.
///
/// GET /i18n/languages
async fn list_languages(State(state): State<AppState>) -> Json<LanguagesResponse> {
    let rtl = state.rtl_languages();
    let languages = state
        .languages()
        .iter()
        .map(|l| LanguageEntry {
            code: l.code.clone(),
            name: l.name.clone(),
            rtl: rtl.contains(&l.code),
        })
        .collect();

    Json(LanguagesResponse {
        default: state.default_language().to_string(),
        languages,
    })
}

/// 302 redirect to `location`, percent-encoded to plain ASCII.
fn found(location: &str) -> Response {
    let value =
        HeaderValue::from_str(&iri_to_uri(location)).unwrap_or_else(|_| HeaderValue::from_static("/"));
    (StatusCode::FOUND, [(LOCATION, value)]).into_response()
}

/// Reduce an absolute URL to its path and query.
fn local_path(next: &str) -> String {
    if !(next.starts_with("http://") || next.starts_with("https://")) {
        return next.to_string();
    }
    match url::Url::parse(next) {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        },
        Err(_) => "/".to_string(),
    }
}

/// Create the language router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/i18n/setlang/", post(set_language))
        .route("/i18n/token", get(csrf_token))
        .route("/i18n/languages", get(list_languages))
}
