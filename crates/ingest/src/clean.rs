//! Body-text cleanup.
//!
//! Cleanup order is fixed: undouble, then strip noise patterns, then trim.
//! Noise stripping must come second — when a body is duplicated the noise
//! substring can straddle the duplication boundary, and stripping it first
//! would break the exact-duplicate check.

use crate::consts::{NOISE_PERMALINK_REGEX, NOISE_REBLOG_REGEX};
use std::borrow::Cow;

/// Collapse a body that an export bug wrote out twice back-to-back.
///
/// The halves are compared with all whitespace removed, because the
/// duplication usually inserts a newline or two at the seam. When they
/// match, the first half (by character count) is kept as-is.
pub fn undouble(text: &str) -> &str {
    if text.is_empty() {
        return text;
    }
    let char_count = text.chars().count();
    let midpoint = text
        .char_indices()
        .map(|(offset, _)| offset)
        .nth(char_count / 2)
        .unwrap_or(text.len());
    let first_half = &text[..midpoint];

    let squashed: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let squashed_half: String = first_half.chars().filter(|c| !c.is_whitespace()).collect();
    let half_len = squashed_half.len();
    let doubled = squashed.len() == half_len * 2
        && squashed[..half_len] == squashed_half
        && squashed[half_len..] == squashed_half;
    if doubled { first_half } else { text }
}

/// Strip export artifacts (stray permalink fragments, reblog attribution
/// lines) from body text.
pub fn strip_noise(text: &str) -> Cow<'_, str> {
    match NOISE_PERMALINK_REGEX.replace_all(text, "") {
        Cow::Borrowed(_) => NOISE_REBLOG_REGEX.replace_all(text, ""),
        Cow::Owned(stripped) => Cow::Owned(NOISE_REBLOG_REGEX.replace_all(&stripped, "").into_owned()),
    }
}

/// The full cleanup pipeline for one text field.
pub fn cleanup(text: &str) -> String {
    strip_noise(undouble(text)).trim().to_string()
}
