//! Demo pages and API endpoint exercising the language stack.

use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_sessions::Session;

use crate::context::inject_language_context;
use crate::csrf::generate_csrf_token;
use crate::error::{AppError, AppResult};
use crate::negotiation::ResolvedLanguage;
use crate::runtime::active_language_or;
use crate::state::AppState;
use crate::translate::{change_language_url, landing_path};

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ LANGUAGE_CODE }}" dir="{{ LANGUAGE_DIR }}">
<head><meta charset="utf-8"><title>{{ path }}</title></head>
<body>
<p>{{ path }}</p>
<ul>
{% for link in links %}<li><a href="{{ link.url }}" hreflang="{{ link.code }}">{{ link.name }}</a></li>
{% endfor %}</ul>
<form method="post" action="/i18n/setlang/">
<input type="hidden" name="_token" value="{{ csrf_token }}">
<input type="hidden" name="next" value="{{ path }}">
<select name="language">
{% for l in LANGUAGES %}<option value="{{ l.code }}"{% if l.code == LANGUAGE_CODE %} selected{% endif %}>{{ l.name }}</option>
{% endfor %}</select>
<button type="submit">Go</button>
</form>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
struct LanguageLink {
    code: String,
    name: String,
    url: String,
}

#[derive(Debug, Serialize)]
struct ApiLanguage {
    active: String,
    resolved: String,
}

/// Redirect the bare root to the resolved language's landing page.
///
/// GET /
async fn root(language: ResolvedLanguage) -> Redirect {
    Redirect::to(&landing_path(language.as_str()))
}

/// Render a language-prefixed page with links and a switch form.
///
/// GET /{lang}/ and GET /{lang}/{*rest}
/// - The prefix only selects the page; a supported prefix is required
/// - `LANGUAGE_CODE` and `dir` follow the language resolved for the request
async fn page(
    State(state): State<AppState>,
    session: Session,
    language: ResolvedLanguage,
    Path(params): Path<Vec<(String, String)>>,
    OriginalUri(uri): OriginalUri,
) -> AppResult<Response> {
    let prefix = params
        .iter()
        .find(|(k, _)| k == "lang")
        .map(|(_, v)| v.as_str())
        .unwrap_or_default();
    if !state.resolver().is_supported(prefix) {
        return Ok((StatusCode::NOT_FOUND, "not found").into_response());
    }

    let full_path = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());

    let links: Vec<LanguageLink> = state
        .languages()
        .iter()
        .map(|l| LanguageLink {
            code: l.code.clone(),
            name: l.name.clone(),
            url: change_language_url(state.translator(), &full_path, &l.code),
        })
        .collect();

    let csrf_token = generate_csrf_token(&session).await?;

    let mut context = tera::Context::new();
    inject_language_context(&state, language.as_str(), &mut context);
    context.insert("path", &full_path);
    context.insert("links", &links);
    context.insert("csrf_token", &csrf_token);

    let html = tera::Tera::one_off(PAGE_TEMPLATE, &context, true)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to render page: {e}")))?;

    Ok(Html(html).into_response())
}

/// Report the language active for an API request.
///
/// GET /api/language
async fn api_language(State(state): State<AppState>, language: ResolvedLanguage) -> Json<ApiLanguage> {
    Json(ApiLanguage {
        active: active_language_or(state.default_language()),
        resolved: language.0,
    })
}

/// Create the demo router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/api/language", get(api_language))
        .route("/{lang}/", get(page))
        .route("/{lang}/{*rest}", get(page))
}
