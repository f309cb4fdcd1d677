//! OAuth credential bundle held by a session.

use chrono::{DateTime, Duration, Utc};
use secrecy::SecretString;

use super::TokenResponse;

/// Access tokens are treated as expired this long before their stated expiry.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Credentials for one connected Gmail account.
#[derive(Debug)]
pub struct TokenBundle {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// Absolute expiry of the access token, if the server reported one.
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
    pub token_type: Option<String>,
}

impl TokenBundle {
    /// Bundle with only an access token and no known expiry.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: None,
            expires_at: None,
            scope: None,
            token_type: Some("Bearer".to_string()),
        }
    }

    pub(super) fn from_response(
        response: TokenResponse,
        previous_refresh: Option<&SecretString>,
    ) -> Self {
        let expires_at = response
            .expires_in
            .and_then(|secs| expiry_after(Utc::now(), secs));
        let refresh_token = response
            .refresh_token
            .map(SecretString::from)
            .or_else(|| previous_refresh.cloned());

        Self {
            access_token: SecretString::from(response.access_token),
            refresh_token,
            expires_at,
            scope: response.scope,
            token_type: response.token_type,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(SecretString::from(refresh_token.into()));
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Whether the access token should no longer be used at `now`.
    ///
    /// Unknown expiry counts as valid; the provider decides.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|at| now + Duration::seconds(EXPIRY_SKEW_SECS) >= at)
    }

    /// Expired but renewable.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.is_expired(now) && self.refresh_token.is_some()
    }
}

/// `now + secs`, or `None` when the server sent a lifetime chrono cannot
/// represent. Unknown expiry counts as valid.
fn expiry_after(now: DateTime<Utc>, secs: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(secs).and_then(|lifetime| now.checked_add_signed(lifetime))
}
