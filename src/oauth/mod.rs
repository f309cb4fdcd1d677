//! Google OAuth2 authorization-code flow.
//!
//! Builds the consent URL, exchanges the callback code for tokens and
//! refreshes expired access tokens. Talks to the token endpoint directly
//! with form-encoded POSTs.

pub mod token;

pub use token::TokenBundle;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::config::GoogleConfig;
use crate::error::OAuthError;

/// Read-only Gmail scope requested at consent time.
pub const GMAIL_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/gmail.readonly";

/// Token endpoint success body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
    refresh_token: Option<String>,
    scope: Option<String>,
    token_type: Option<String>,
}

/// Token endpoint error body (RFC 6749 §5.2).
#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

/// OAuth client for Google's authorization server.
pub struct OAuthClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
}

impl OAuthClient {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }

    /// Consent URL: read-only mail scope, offline access, forced consent.
    pub fn authorization_url(&self) -> Result<String, OAuthError> {
        let url = Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", GMAIL_READONLY_SCOPE),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| OAuthError::InvalidUrl(format!("{}: {e}", self.auth_url)))?;

        Ok(url.into())
    }

    /// Exchange an authorization code for a token bundle.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenBundle, OAuthError> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self.token_request(&params).await?;
        debug!(scope = ?response.scope, "Authorization code exchanged");
        Ok(TokenBundle::from_response(response, None))
    }

    /// Trade a refresh token for a fresh access token.
    ///
    /// Google usually omits `refresh_token` on refresh; the existing one is
    /// kept in that case.
    pub async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenBundle, OAuthError> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("refresh_token", refresh_token.expose_secret()),
            ("grant_type", "refresh_token"),
        ];

        let response = self.token_request(&params).await?;
        debug!("Access token refreshed");
        Ok(TokenBundle::from_response(response, Some(refresh_token)))
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse, OAuthError> {
        let response = self
            .client
            .post(&self.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| OAuthError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<TokenErrorResponse>(&body) {
                Ok(err) if err.error == "invalid_grant" => {
                    OAuthError::InvalidGrant(err.error_description.unwrap_or(err.error))
                }
                _ => {
                    warn!(status = status.as_u16(), "Token endpoint returned an error");
                    OAuthError::TokenRequest {
                        status: status.as_u16(),
                        body,
                    }
                }
            });
        }

        response
            .json()
            .await
            .map_err(|e| OAuthError::InvalidResponse(e.to_string()))
    }
}
