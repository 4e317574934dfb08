#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! Builds the real router over an in-memory session store, with three
//! languages (`en`, `ar`, `ur`) and a small route table.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use tower_sessions::cookie::{Cookie, SameSite};

use language_manager::session::session_layer;
use language_manager::{AppState, Config, RouteTable, build_router};

/// Language cookie name used by the test configuration.
pub const LANGUAGE_COOKIE: &str = "site_language";

/// Test application wrapper using the real routes and middleware.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("LANGUAGES", "en:English,ar:العربية,ur:اردو"),
            ("LANGUAGE_CODE", "en"),
            ("RTL_LANGUAGES", "ar,ur"),
            ("LANGUAGE_COOKIE_NAME", LANGUAGE_COOKIE),
            ("LANGUAGE_COOKIE_AGE", "31536000"),
            ("LANGUAGE_COOKIE_PATH", "/"),
            ("LANGUAGE_COOKIE_DOMAIN", "example.com"),
            ("LANGUAGE_COOKIE_SECURE", "true"),
            ("LANGUAGE_COOKIE_HTTPONLY", "true"),
            ("LANGUAGE_COOKIE_SAMESITE", "lax"),
        ]);
        let config = Config::from_vars(|key| vars.get(key).map(|v| v.to_string())).unwrap();

        let table = RouteTable::new(config.languages.clone())
            .route("/")
            .unwrap()
            .route("/jobs/")
            .unwrap()
            .route("/jobs/{id}/")
            .unwrap()
            .slug("ar", "jobs", "wazaif")
            .unwrap();

        let state = AppState::with_translator(&config, Arc::new(table));
        let router = build_router(state.clone()).layer(session_layer(
            MemoryStore::default(),
            false,
            SameSite::Lax,
        ));

        Self { router, state }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str) -> Response {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Fetch a CSRF token, returning it with the session cookie pair.
    pub async fn csrf_token(&self) -> (String, String) {
        let response = self.get("/i18n/token").await;
        assert_eq!(response.status(), 200);
        let session = session_cookie(&response).expect("session cookie");
        let json = body_json(response).await;
        (json["csrf_token"].as_str().unwrap().to_string(), session)
    }

    /// POST the language switch form.
    pub async fn set_language(
        &self,
        form: &[(&str, &str)],
        session: Option<&str>,
        referer: Option<&str>,
    ) -> Response {
        let body = form
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::post("/i18n/setlang/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, session);
        }
        if let Some(referer) = referer {
            builder = builder.header(header::REFERER, referer);
        }
        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    /// Language the page middleware resolves for a bare request carrying
    /// only the given cookies, read from the root redirect.
    pub async fn resolved_page_language(&self, cookies: &str) -> String {
        let response = self
            .request(
                Request::get("/")
                    .header(header::COOKIE, cookies)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        let location = location(&response);
        location.trim_matches('/').to_string()
    }
}

/// All `Set-Cookie` headers parsed as cookies.
pub fn set_cookies(response: &Response) -> Vec<Cookie<'static>> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| Cookie::parse(v.to_str().unwrap().to_string()).unwrap())
        .collect()
}

/// The `Set-Cookie` for `name`, if present.
pub fn set_cookie(response: &Response, name: &str) -> Option<Cookie<'static>> {
    set_cookies(response).into_iter().find(|c| c.name() == name)
}

/// `name=value` for the session cookie set by the session layer.
pub fn session_cookie(response: &Response) -> Option<String> {
    set_cookie(response, "id").map(|c| format!("{}={}", c.name(), c.value()))
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .unwrap()
        .to_string()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
