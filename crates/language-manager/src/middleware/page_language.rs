//! Language negotiation for page requests.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::negotiation::{RequestLanguageSignals, ResolvedLanguage};
use crate::runtime::with_language;
use crate::session::session_language;
use crate::state::AppState;

/// Middleware to resolve the active language for page requests.
///
/// Uses the full signal chain (headers, cookie, session, URL prefix) and
/// attaches [`ResolvedLanguage`] to the request. The language is active for
/// the downstream handler only. API paths are left to
/// [`api_language`](super::api_language).
pub async fn page_language(
    State(state): State<AppState>,
    session: Session,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if state.is_api_path(request.uri().path()) {
        return next.run(request).await;
    }

    let resolver = state.resolver();
    let mut signals = RequestLanguageSignals::from_headers(request.headers(), &state.cookie().name);
    signals.session = session_language(&session).await;
    signals.url_prefix = resolver
        .extract_prefix(request.uri().path())
        .map(|(lang, _)| lang.to_string());

    let language = resolver.resolve(&signals);
    tracing::debug!(
        path = %request.uri().path(),
        language = %language,
        "resolved page language"
    );

    request
        .extensions_mut()
        .insert(ResolvedLanguage(language.clone()));

    with_language(language, next.run(request)).await
}
