//! Email digest pipeline.
//!
//! One run flows through:
//! 1. `MailProvider::list_recent()` for the newest message ids
//! 2. `MailProvider::get_message()` per id, in parallel
//! 3. `extract_email()` for headers plus cleaned, truncated body
//! 4. `Summarizer::summarize()` per email, in parallel
//! 5. `display_sender()` / `format_date()` for the display row

pub mod extract;
pub mod format;
pub mod summarizer;
pub mod types;
pub mod workflow;

pub use summarizer::Summarizer;
pub use types::{EmailSummary, ExtractedEmail};
pub use workflow::SummarizeWorkflow;
