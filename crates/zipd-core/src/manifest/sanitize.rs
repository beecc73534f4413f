//! Archive entry name sanitization.

/// Fallback when sanitization leaves nothing usable.
pub const FALLBACK_NAME: &str = "download";

/// Sanitizes a requested archive entry name.
///
/// - Replaces runs of `\`, `/`, or control characters (CR, LF, and tab
///   included) with a single `_`
/// - Strips double quotes (they would break the Content-Disposition header)
/// - Trims leading/trailing whitespace
/// - Returns `"download"` if nothing remains
///
/// Idempotent: applying it twice gives the same result.
pub fn sanitize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_separator = false;

    for c in raw.chars() {
        if c == '\\' || c == '/' || c.is_control() {
            if !prev_separator {
                out.push('_');
            }
            prev_separator = true;
        } else {
            out.push(c);
            prev_separator = false;
        }
    }

    let stripped: String = out.chars().filter(|&c| c != '"').collect();
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
