//! Export-name sanitization.
//!
//! Mirrors the target export format's identifier constraints so collisions
//! can be detected before they surface downstream.

/// Sanitizes a display name the way the export format will.
///
/// Lowercases, replaces every character outside `[a-zA-Z0-9_.-]` with `_`,
/// and collapses runs of `_` into one. Two display names that map to the
/// same sanitized string will collide in the exported file even though the
/// host tool keeps them distinct.
pub fn sanitize_export_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-') {
            ch.to_ascii_lowercase()
        } else {
            '_'
        };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }
    out
}
