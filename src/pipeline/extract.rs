//! Turns a raw Gmail message into an `ExtractedEmail`.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{ExtractedEmail, NO_SUBJECT, UNKNOWN_DATE, UNKNOWN_SENDER};
use crate::gmail::RawMessage;
use crate::gmail::mime::extract_body;

/// Marker appended to bodies cut at the length limit.
pub const TRUNCATION_MARKER: &str = "...";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Heuristic markup removal.
///
/// Every `<...>` token becomes a space, whitespace runs collapse to one
/// space, and the result is trimmed. Entities are left as-is and
/// `<script>`/`<style>` contents survive.
pub fn strip_html(text: &str) -> String {
    let without_tags = TAG.replace_all(text, " ");
    WHITESPACE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Cut `body` to `limit` characters, appending `...` when anything was cut.
pub fn truncate_body(body: String, limit: usize) -> String {
    match body.char_indices().nth(limit) {
        Some((byte_idx, _)) => {
            let mut cut = body[..byte_idx].to_string();
            cut.push_str(TRUNCATION_MARKER);
            cut
        }
        None => body,
    }
}

/// Headers (with placeholders) plus the cleaned, bounded body.
pub fn extract_email(message: &RawMessage, body_limit: usize) -> ExtractedEmail {
    let header = |name: &str, fallback: &str| -> String {
        message
            .header(name)
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };

    let raw_body = message
        .payload
        .as_ref()
        .map(extract_body)
        .unwrap_or_default();

    ExtractedEmail {
        from: header("From", UNKNOWN_SENDER),
        subject: header("Subject", NO_SUBJECT),
        date: header("Date", UNKNOWN_DATE),
        body: truncate_body(strip_html(&raw_body), body_limit),
    }
}
