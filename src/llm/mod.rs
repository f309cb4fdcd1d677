//! LLM integration for Inbox Digest.
//!
//! A single OpenAI-compatible chat completion backend, reached directly over
//! `reqwest`. Callers depend on the `LlmProvider` trait so tests can swap in
//! stub providers.

pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;

use crate::config::OpenAiConfig;

/// Create the LLM provider from configuration.
pub fn create_provider(config: &OpenAiConfig) -> Arc<dyn LlmProvider> {
    tracing::info!("Using OpenAI-compatible endpoint (model: {})", config.model);
    Arc::new(OpenAiProvider::new(
        &config.base_url,
        config.api_key.clone(),
        &config.model,
    ))
}
