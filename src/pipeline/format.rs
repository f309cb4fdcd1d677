//! Display formatting for digest rows.

use chrono::{DateTime, FixedOffset};

/// Output shape for dates, e.g. `Jan 5, 3:07 PM`.
const DATE_FORMAT: &str = "%b %-d, %-I:%M %p";

/// Sender display name: the text before the first `<`, trimmed.
///
/// `Jane Doe <jane@x.com>` → `Jane Doe`; a bare address is returned as-is.
/// When nothing precedes the bracket (`<jane@x.com>`), the bracketed
/// address is used instead of an empty name.
pub fn display_sender(from: &str) -> String {
    match from.split_once('<') {
        Some((name, rest)) => {
            let name = name.trim();
            if name.is_empty() {
                rest.split('>').next().unwrap_or_default().trim().to_string()
            } else {
                name.to_string()
            }
        }
        None => from.trim().to_string(),
    }
}

/// Short human-readable form of a raw `Date` header, in the header's own
/// offset. Headers that do not parse are returned unmodified.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format(DATE_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

fn parse_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc2822(strip_trailing_comment(trimmed))
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
        .ok()
}

/// Drops a trailing RFC 2822 comment such as ` (UTC)`.
fn strip_trailing_comment(value: &str) -> &str {
    if value.ends_with(')')
        && let Some(open) = value.rfind('(')
    {
        return value[..open].trim_end();
    }
    value
}
