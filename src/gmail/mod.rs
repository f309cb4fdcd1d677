//! Gmail access: wire types, MIME text extraction and the REST client.

pub mod client;
pub mod mime;
pub mod types;

pub use client::GmailClient;
pub use types::{MessagePart, MessageRef, RawMessage};

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::MailError;

/// Read-only mailbox access used by the summarize workflow.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Ids of the most recent messages, newest first, in provider order.
    async fn list_recent(
        &self,
        access_token: &SecretString,
        max_results: u32,
    ) -> Result<Vec<MessageRef>, MailError>;

    /// Full message: headers plus the MIME part tree.
    async fn get_message(
        &self,
        access_token: &SecretString,
        id: &str,
    ) -> Result<RawMessage, MailError>;
}
