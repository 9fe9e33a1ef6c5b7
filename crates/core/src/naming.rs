//! Download file naming.
//!
//! Generated artifacts are exported as `stager-{tag}-{unix_millis}.png`.
//! The variant tag keeps batch outputs apart and the millisecond
//! timestamp avoids collisions between runs.

use crate::types::Timestamp;

/// Prefix shared by every exported file.
pub const DOWNLOAD_PREFIX: &str = "stager";

/// Build the export file name for an artifact.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use stager_core::naming::download_filename;
///
/// let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
/// assert_eq!(download_filename(Some("modern"), at), "stager-modern-1700000000123.png");
/// assert_eq!(download_filename(None, at), "stager-1700000000123.png");
/// ```
pub fn download_filename(tag: Option<&str>, created_at: Timestamp) -> String {
    let millis = created_at.timestamp_millis();
    match tag.map(sanitize_tag).filter(|t| !t.is_empty()) {
        Some(tag) => format!("{DOWNLOAD_PREFIX}-{tag}-{millis}.png"),
        None => format!("{DOWNLOAD_PREFIX}-{millis}.png"),
    }
}

/// Lowercase, with anything outside `[a-z0-9_]` replaced by `_`.
fn sanitize_tag(tag: &str) -> String {
    tag.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
