//! Type definitions for vidshelf
//!
//! Source of truth for all data structures.

use serde::{Deserialize, Serialize};

/// Substituted for any thumbnail that fails validation.
pub const PLACEHOLDER_THUMBNAIL: &str =
    "https://placehold.co/300x200/1a1a1a/ff6b6b?text=No+Thumbnail";

/// Navigation target when neither link on a record is usable.
pub const DEFAULT_FALLBACK_URL: &str = "https://www.cartoonpornvideos.com/";

pub const UNTITLED_VIDEO: &str = "Untitled Video";

// ============================================
// Video Types
// ============================================

/// One entry of the raw catalog, every field optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// URL to thumbnail image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Link to the listing page, or "#"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail_url: Option<String>,
    /// Link to the hosting site, or "#"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    /// Tag labels in catalog order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl VideoRecord {
    /// Title trimmed, or None when absent or blank
    pub fn trimmed_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// A record after validation, link resolution and default substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedVideo {
    pub title: String,
    /// Validated thumbnail or [`PLACEHOLDER_THUMBNAIL`]
    pub thumbnail: String,
    /// Always an http(s) URL
    pub resolved_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// A tag and the number of videos carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

// ============================================
// Policy Types
// ============================================

/// How thumbnails are judged
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailPolicy {
    /// URL syntax, scheme and placeholder-marker checks
    #[default]
    Strict,
    /// Only http prefix and "undefined"/"null" checks
    Lenient,
}

/// Which link a card navigates to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum UrlStrategy {
    /// external_url whenever it is usable
    PreferExternal,
    /// external_url unless it points at a known redirect domain
    #[default]
    SkipRedirects,
}

/// How wide the duplicate net is
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DedupeMode {
    /// title|thumbnail|detail_url|external_url
    #[default]
    Standard,
    /// Standard key plus categories, rejecting on either key
    Strict,
}

/// What happens to a record without a title
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UntitledPolicy {
    /// Keep it as "Untitled Video"
    #[default]
    Default,
    /// Leave it out
    Drop,
}

// ============================================
// Config Types
// ============================================

/// User configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file path or http(s) URL (default: "videos.json")
    pub source: String,
    /// Catalog fetch timeout in seconds (default: 10)
    pub fetch_timeout_secs: u64,
    pub thumbnail_policy: ThumbnailPolicy,
    pub url_strategy: UrlStrategy,
    pub dedupe_mode: DedupeMode,
    pub untitled: UntitledPolicy,
    /// Drop records with neither a usable external nor detail link
    pub require_link: bool,
    /// Drop records failing the title/thumbnail check instead of patching them
    pub filter_invalid: bool,
    /// Where unresolvable cards point
    pub fallback_url: String,
    /// Appended to the built-in redirect denylist
    pub extra_redirect_domains: Vec<String>,
    /// Tag cloud size (default: 6)
    pub top_categories: usize,
    /// tracing filter directive when RUST_LOG is unset (default: "warn")
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "videos.json".into(),
            fetch_timeout_secs: 10,
            thumbnail_policy: ThumbnailPolicy::default(),
            url_strategy: UrlStrategy::default(),
            dedupe_mode: DedupeMode::default(),
            untitled: UntitledPolicy::default(),
            require_link: true,
            filter_invalid: true,
            fallback_url: DEFAULT_FALLBACK_URL.into(),
            extra_redirect_domains: Vec::new(),
            top_categories: 6,
            log_level: "warn".into(),
        }
    }
}

// ============================================
// View Types
// ============================================

/// Narrowing applied after the pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Exact (case-insensitive) tag; "All Videos" or None means everything
    pub category: Option<String>,
    /// Title or tag substring
    pub query: Option<String>,
    /// Cap on returned videos
    pub limit: Option<usize>,
}
