//! Thumbnail validation
//!
//! A thumbnail is rejected when it is missing, unparseable, uses an inline
//! scheme, or carries any marker that stand-in images tend to have.

use crate::types::ThumbnailPolicy;
use url::Url;

const BLOCKED_SCHEMES: [&str; 3] = ["data:", "blob:", "javascript:"];

/// Lowercase substrings that identify a stand-in image
pub const PLACEHOLDER_MARKERS: [&str; 14] = [
    "placehold.co",
    "placeholder",
    "no thumbnail",
    "no image",
    "image not found",
    "thumbnail not available",
    "not available",
    "default",
    "missing",
    "error",
    "undefined",
    "null",
    "blank",
    "empty",
];

fn has_marker(haystack: &str) -> bool {
    PLACEHOLDER_MARKERS.iter().any(|m| haystack.contains(m))
}

/// Check a thumbnail under the given policy
pub fn is_valid(url: Option<&str>, policy: ThumbnailPolicy) -> bool {
    match policy {
        ThumbnailPolicy::Strict => validate_thumbnail(url),
        ThumbnailPolicy::Lenient => validate_thumbnail_lenient(url),
    }
}

/// Full check: syntax, scheme, and markers in the URL, its decoded query
/// values, and its raw query string
pub fn validate_thumbnail(url: Option<&str>) -> bool {
    let Some(trimmed) = url.map(str::trim).filter(|u| !u.is_empty()) else {
        return false;
    };

    if Url::parse(trimmed).is_err() {
        return false;
    }

    let lower = trimmed.to_lowercase();
    if BLOCKED_SCHEMES.iter().any(|s| lower.starts_with(s)) {
        return false;
    }

    !contains_placeholder_marker(trimmed)
}

/// Marker scan over a raw URL string.
///
/// Falls back to a plain substring scan when the string does not parse.
pub fn contains_placeholder_marker(raw: &str) -> bool {
    let lower = raw.to_lowercase();
    if has_marker(&lower) {
        return true;
    }

    let Ok(parsed) = Url::parse(raw.trim()) else {
        return false;
    };

    // Decoding turns "No+Thumbnail" and "No%20Image" into plain words
    let in_params = parsed
        .query_pairs()
        .any(|(_, value)| has_marker(&value.to_lowercase()));
    if in_params {
        return true;
    }

    parsed
        .query()
        .map(|q| has_marker(&q.to_lowercase()))
        .unwrap_or(false)
}

/// Cheap check used by pages that only guard against obviously broken values
pub fn validate_thumbnail_lenient(url: Option<&str>) -> bool {
    let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
        return false;
    };
    url.starts_with("http") && !url.contains("undefined") && !url.contains("null")
}
