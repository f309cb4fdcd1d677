//! Plain-text extraction from Gmail MIME part trees.
//!
//! Walks the part tree in document order and concatenates every
//! `text/plain` leaf that carries inline data. Payloads are base64url; a
//! payload that fails to decode contributes nothing rather than failing the
//! message.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use tracing::warn;

use super::types::MessagePart;

/// Deepest nesting level that is still traversed. Parts below it are skipped.
pub const MAX_PART_DEPTH: usize = 32;

/// Standard-alphabet decoder that tolerates missing padding, as Gmail omits it.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a base64url payload into text.
///
/// `-`/`_` are mapped onto the standard alphabet before decoding. Malformed
/// input yields an empty string; invalid UTF-8 sequences are replaced.
pub fn decode_base64url(data: &str) -> String {
    let standard: String = data
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    match STANDARD_LENIENT.decode(standard.trim()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    }
}

/// Concatenated text of every `text/plain` part with inline data.
///
/// Containers are recursed into whatever their own MIME type; all other
/// leaves (including `text/html`) are ignored. No separator is inserted.
pub fn extract_text_from_parts(parts: &[MessagePart]) -> String {
    let mut text = String::new();
    let mut depth_exceeded = false;
    collect_plain_text(parts, 0, &mut text, &mut depth_exceeded);

    if depth_exceeded {
        warn!(
            max_depth = MAX_PART_DEPTH,
            "MIME part tree exceeds depth bound, deeper parts skipped"
        );
    }
    text
}

fn collect_plain_text(
    parts: &[MessagePart],
    depth: usize,
    text: &mut String,
    depth_exceeded: &mut bool,
) {
    if depth >= MAX_PART_DEPTH {
        *depth_exceeded = true;
        return;
    }

    for part in parts {
        if part.mime_type.as_deref() == Some("text/plain")
            && let Some(data) = part.data()
        {
            text.push_str(&decode_base64url(data));
        } else if !part.parts.is_empty() {
            collect_plain_text(&part.parts, depth + 1, text, depth_exceeded);
        }
    }
}

/// Raw body text of a message payload.
///
/// Inline data on the payload itself wins regardless of its MIME type, so a
/// single-part HTML message comes back as HTML for the stripper to clean.
pub fn extract_body(payload: &MessagePart) -> String {
    match payload.data() {
        Some(data) => decode_base64url(data),
        None => extract_text_from_parts(&payload.parts),
    }
}
