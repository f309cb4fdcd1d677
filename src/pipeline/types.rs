//! Pipeline data types.

use serde::{Deserialize, Serialize};

/// Placeholder when the `From` header is missing.
pub const UNKNOWN_SENDER: &str = "Unknown";
/// Placeholder when the `Subject` header is missing.
pub const NO_SUBJECT: &str = "No Subject";
/// Placeholder when the `Date` header is missing.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Headers and cleaned body of one message, ready for summarization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEmail {
    /// Raw `From` header.
    pub from: String,
    pub subject: String,
    /// Raw `Date` header.
    pub date: String,
    /// Markup-stripped, whitespace-collapsed, length-bounded body.
    pub body: String,
}

/// One row of the digest returned to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSummary {
    /// Sender display name.
    pub from: String,
    pub subject: String,
    pub summary: String,
    /// Short human-readable date, or the raw header if it did not parse.
    pub date: String,
}
