//! Stored-filename generation for attachment blobs.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Sanitize a user-supplied filename for use on disk.
///
/// Only ASCII alphanumeric characters, dots, hyphens, and underscores
/// survive; everything else becomes an underscore. The result is never used
/// as a path component source of truth on its own — see [`stored_name`].
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Generate a collision-resistant stored filename.
///
/// Format: `{UTC stamp}-{8 hex chars}-{sanitized original}`. The timestamp
/// keeps names chronologically sortable; the random infix makes same-tick
/// uploads of an identically named file distinct.
#[must_use]
pub fn stored_name(now: DateTime<Utc>, original: &str) -> String {
    let stamp = now.format("%Y%m%dT%H%M%S%3f");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{stamp}-{}-{}", &suffix[..8], sanitize_filename(original))
}
