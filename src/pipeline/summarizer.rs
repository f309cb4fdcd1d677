//! One-shot email summarization over an `LlmProvider`.

use std::sync::Arc;

use tracing::debug;

use super::types::ExtractedEmail;
use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

/// Returned when the model produces no usable text.
pub const FALLBACK_SUMMARY: &str = "Unable to summarize.";

/// Max tokens for a summary (1–2 sentences).
const SUMMARY_MAX_TOKENS: u32 = 100;

/// Temperature for summaries (deterministic-ish).
const SUMMARY_TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes emails concisely. \
Provide a 1-2 sentence summary that captures the key point or action item of the email.";

/// Produces 1–2 sentence summaries. Provider errors are returned, not retried.
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn LlmProvider>,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub async fn summarize(&self, email: &ExtractedEmail) -> Result<String, LlmError> {
        let request = CompletionRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(build_user_prompt(email)),
        ])
        .with_temperature(SUMMARY_TEMPERATURE)
        .with_max_tokens(SUMMARY_MAX_TOKENS);

        let response = self.llm.complete(request).await?;

        if response.content.trim().is_empty() {
            debug!(
                model = self.llm.model_name(),
                finish_reason = ?response.finish_reason,
                "Empty completion, using fallback summary"
            );
            return Ok(FALLBACK_SUMMARY.to_string());
        }
        Ok(response.content)
    }
}

fn build_user_prompt(email: &ExtractedEmail) -> String {
    format!(
        "Please summarize this email:\n\nFrom: {}\nSubject: {}\n\nBody:\n{}",
        email.from, email.subject, email.body
    )
}
