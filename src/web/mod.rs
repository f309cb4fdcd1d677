//! HTTP surface: OAuth endpoints, the summarize API and the two HTML pages.

pub mod auth;
pub mod pages;
pub mod status;
pub mod summarize;

use std::sync::Arc;

use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::oauth::OAuthClient;
use crate::pipeline::SummarizeWorkflow;
use crate::session::SessionStore;

/// Path of the workflow page; the OAuth callback redirects here.
pub const WORKFLOW_PAGE: &str = "/workflows/gmail-summarizer";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub oauth: Arc<OAuthClient>,
    pub workflow: Arc<SummarizeWorkflow>,
    /// Adds `Secure` to session cookies.
    pub secure_cookies: bool,
}

/// Build the Axum router with every route and request tracing.
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::landing))
        .route(WORKFLOW_PAGE, get(pages::workflow_page))
        .route("/health", get(health))
        .route("/api/gmail/auth", get(auth::auth_url))
        .route("/api/gmail/callback", get(auth::callback))
        .route("/api/gmail/summarize", post(summarize::summarize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "inbox-digest"
    }))
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::test_support::{StubMail, state_with};
    use super::*;

    #[tokio::test]
    async fn health_reports_service() {
        let app = app_routes(state_with(Arc::new(StubMail::default()), "http://127.0.0.1:9/token"));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"status": "ok", "service": "inbox-digest"}));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = app_routes(state_with(Arc::new(StubMail::default()), "http://127.0.0.1:9/token"));
        let response = app
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
