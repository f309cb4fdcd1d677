//! OAuth endpoints: consent URL and the authorization-code callback.

use axum::{
    Json,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::{AppState, WORKFLOW_PAGE};
use crate::session::cookie::session_cookie;

pub async fn auth_url(State(state): State<AppState>) -> impl IntoResponse {
    match state.oauth.authorization_url() {
        Ok(url) => (StatusCode::OK, Json(serde_json::json!({ "authUrl": url }))),
        Err(e) => {
            error!(error = %e, "Failed to build consent URL");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "Failed to generate auth URL"})),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

/// Google redirects here after consent. Always answers with a redirect to
/// the workflow page; only a successful exchange sets the session cookie.
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(reason) = params.error.filter(|e| !e.is_empty()) {
        warn!(reason = %reason, "OAuth consent not granted");
        return redirect_with("error=access_denied");
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        warn!("OAuth callback without authorization code");
        return redirect_with("error=no_code");
    };

    match state.oauth.exchange_code(&code).await {
        Ok(tokens) => {
            let session = state.sessions.create(tokens).await;
            info!(session_id = %session.id, "Gmail connected");
            (
                [(
                    header::SET_COOKIE,
                    session_cookie(session.id, state.secure_cookies),
                )],
                redirect_to("connected=true"),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Error exchanging code for tokens");
            redirect_with("error=token_exchange_failed")
        }
    }
}

fn redirect_to(query: &str) -> Redirect {
    Redirect::to(&format!("{WORKFLOW_PAGE}?{query}"))
}

fn redirect_with(query: &str) -> Response {
    redirect_to(query).into_response()
}
