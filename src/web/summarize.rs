//! `POST /api/gmail/summarize`: run the digest for the caller's session.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{error, info, warn};

use super::AppState;
use crate::error::SummarizeError;
use crate::oauth::TokenBundle;
use crate::session::Session;
use crate::session::cookie::{clear_session_cookie, session_id};

pub async fn summarize(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = match session_id(&headers) {
        Some(id) => state.sessions.get(id).await,
        None => None,
    };
    let Some(session) = session else {
        return reject(SummarizeError::AuthenticationMissing, &state);
    };

    let tokens = match fresh_tokens(&state, &session).await {
        Ok(tokens) => tokens,
        Err(kind) => {
            if kind == SummarizeError::AuthenticationExpired {
                state.sessions.remove(session.id).await;
            }
            return reject(kind, &state);
        }
    };

    match state.workflow.run(&tokens.access_token).await {
        Ok(summaries) => {
            info!(session_id = %session.id, count = summaries.len(), "Summaries delivered");
            (
                StatusCode::OK,
                Json(serde_json::json!({ "summaries": summaries })),
            )
                .into_response()
        }
        Err(e) => {
            let kind = SummarizeError::from(&e);
            if kind == SummarizeError::AuthenticationExpired {
                warn!(session_id = %session.id, error = %e, "Gmail rejected credentials");
                state.sessions.remove(session.id).await;
            } else {
                error!(session_id = %session.id, error = %e, "Error summarizing emails");
            }
            reject(kind, &state)
        }
    }
}

/// Session tokens, refreshed first when the access token has lapsed and a
/// refresh token is on hand.
async fn fresh_tokens(
    state: &AppState,
    session: &Session,
) -> Result<Arc<TokenBundle>, SummarizeError> {
    let tokens = &session.tokens;
    let Some(refresh_token) = tokens
        .refresh_token
        .as_ref()
        .filter(|_| tokens.needs_refresh(Utc::now()))
    else {
        return Ok(Arc::clone(tokens));
    };

    match state.oauth.refresh(refresh_token).await {
        Ok(refreshed) => state
            .sessions
            .update_tokens(session.id, refreshed)
            .await
            .map(|s| s.tokens)
            .ok_or(SummarizeError::AuthenticationMissing),
        Err(e) => {
            warn!(session_id = %session.id, error = %e, "Token refresh failed");
            Err(SummarizeError::from(&e))
        }
    }
}

fn reject(kind: SummarizeError, state: &AppState) -> Response {
    let body = Json(serde_json::json!({ "error": kind.to_string() }));
    match kind {
        SummarizeError::AuthenticationMissing => (StatusCode::UNAUTHORIZED, body).into_response(),
        SummarizeError::AuthenticationExpired => (
            StatusCode::UNAUTHORIZED,
            [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies))],
            body,
        )
            .into_response(),
        SummarizeError::ProcessingFailure => {
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    }
}
