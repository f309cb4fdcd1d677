//! Summarize workflow: list → fetch (parallel) → extract → summarize
//! (parallel) → ordered digest.
//!
//! All-or-nothing: the first failure in either fan-out stage fails the run.

use std::sync::Arc;

use futures::future::try_join_all;
use secrecy::SecretString;
use tracing::{debug, info};

use super::extract::extract_email;
use super::format::{display_sender, format_date};
use super::summarizer::Summarizer;
use super::types::{EmailSummary, ExtractedEmail};
use crate::config::PipelineConfig;
use crate::error::WorkflowError;
use crate::gmail::MailProvider;

/// Runs one digest for one access token.
pub struct SummarizeWorkflow {
    mail: Arc<dyn MailProvider>,
    summarizer: Summarizer,
    config: PipelineConfig,
}

impl SummarizeWorkflow {
    pub fn new(
        mail: Arc<dyn MailProvider>,
        summarizer: Summarizer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            mail,
            summarizer,
            config,
        }
    }

    /// Summaries of the most recent messages, in provider order.
    pub async fn run(
        &self,
        access_token: &SecretString,
    ) -> Result<Vec<EmailSummary>, WorkflowError> {
        let refs = self
            .mail
            .list_recent(access_token, self.config.max_messages)
            .await?;

        if refs.is_empty() {
            info!("Mailbox empty, nothing to summarize");
            return Ok(Vec::new());
        }

        let emails = try_join_all(
            refs.iter()
                .map(|r| self.fetch_and_extract(access_token, &r.id)),
        )
        .await?;
        debug!(count = emails.len(), "Messages fetched and extracted");

        let summaries = try_join_all(emails.iter().map(|email| self.summarize(email))).await?;

        info!(count = summaries.len(), "Digest complete");
        Ok(summaries)
    }

    async fn fetch_and_extract(
        &self,
        access_token: &SecretString,
        id: &str,
    ) -> Result<ExtractedEmail, WorkflowError> {
        let message = self.mail.get_message(access_token, id).await?;
        Ok(extract_email(&message, self.config.body_limit))
    }

    async fn summarize(&self, email: &ExtractedEmail) -> Result<EmailSummary, WorkflowError> {
        let summary = self.summarizer.summarize(email).await?;
        Ok(EmailSummary {
            from: display_sender(&email.from),
            subject: email.subject.clone(),
            summary,
            date: format_date(&email.date),
        })
    }
}
