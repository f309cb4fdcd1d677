//! Gmail REST v1 client.
//!
//! Uses two endpoints:
//! - `users.messages.list` for the most recent message ids
//! - `users.messages.get?format=full` for headers and the part tree

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::MailProvider;
use super::types::{ListMessagesResponse, MessageRef, RawMessage};
use crate::error::MailError;

/// Gmail API client. One instance serves every session; the access token is
/// passed per call.
pub struct GmailClient {
    client: reqwest::Client,
    api_base: String,
}

impl GmailClient {
    /// `api_base` is the per-user root, e.g.
    /// `https://gmail.googleapis.com/gmail/v1/users/me`.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        access_token: &SecretString,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, MailError> {
        let url = format!("{}{}", self.api_base, endpoint);

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token.expose_secret())
            .query(query)
            .send()
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| MailError::InvalidResponse(format!("parse response: {e}")))
    }

    async fn error_from_response(response: reqwest::Response) -> MailError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 => MailError::Unauthorized(body),
            404 => MailError::NotFound(body),
            code => MailError::Api { status: code, body },
        }
    }
}

#[async_trait]
impl MailProvider for GmailClient {
    async fn list_recent(
        &self,
        access_token: &SecretString,
        max_results: u32,
    ) -> Result<Vec<MessageRef>, MailError> {
        let max = max_results.to_string();
        let list: ListMessagesResponse = self
            .get(access_token, "/messages", &[("maxResults", max.as_str())])
            .await?;

        debug!(count = list.messages.len(), "Listed recent messages");
        Ok(list.messages)
    }

    async fn get_message(
        &self,
        access_token: &SecretString,
        id: &str,
    ) -> Result<RawMessage, MailError> {
        self.get(access_token, &format!("/messages/{id}"), &[("format", "full")])
            .await
    }
}
