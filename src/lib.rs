//! Inbox Digest: Gmail connect plus one-click LLM summaries of the ten
//! most recent messages.

pub mod config;
pub mod error;
pub mod gmail;
pub mod llm;
pub mod oauth;
pub mod pipeline;
pub mod session;
pub mod web;
