//! Link resolution
//!
//! Picks the single URL a card navigates to.

use tracing::warn;

use crate::types::{DEFAULT_FALLBACK_URL, UrlStrategy, VideoRecord};

/// Domains that bounce through ads or aggregators instead of the video
pub const REDIRECT_DENYLIST: [&str; 24] = [
    "sortporn.com",
    "bit.ly",
    "lustyheroes.com",
    "youfetishbitch.com",
    "bemyhole.com",
    "tsyndicate.com",
    "theporndude.com",
    "rpwmct.com",
    "60fpsanimation.com",
    "hentaismile.com",
    "lesbian8.com",
    "freeporn8.com",
    "welcomix.com",
    "fapality.com",
    "mylust.com",
    "eporner.com",
    "xxxfree.watch",
    "zlink7.com",
    "adtng.com",
    "ylmcash.com",
    "aberatii.com",
    "kimsaliese.com",
    "whitehardcorp.com",
    "brazzersnetwork.com",
];

/// Resolution settings shared by every record in a run
#[derive(Debug, Clone)]
pub struct LinkResolver {
    strategy: UrlStrategy,
    fallback_url: String,
    extra_domains: Vec<String>,
}

impl LinkResolver {
    /// A fallback that is not an http(s) URL is replaced by
    /// [`DEFAULT_FALLBACK_URL`]
    pub fn new(strategy: UrlStrategy, fallback_url: impl Into<String>) -> Self {
        let fallback_url = fallback_url.into().trim().to_string();
        let fallback_url = if is_http(&fallback_url) {
            fallback_url
        } else {
            warn!(rejected = %fallback_url, "fallback_url is not http(s), using default");
            DEFAULT_FALLBACK_URL.to_string()
        };

        Self {
            strategy,
            fallback_url,
            extra_domains: Vec::new(),
        }
    }

    /// Add domains on top of [`REDIRECT_DENYLIST`]
    pub fn with_extra_domains(mut self, domains: &[String]) -> Self {
        self.extra_domains = domains
            .iter()
            .map(|d| d.trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        self
    }

    /// True when the URL mentions a denylisted domain
    pub fn is_redirect(&self, url: &str) -> bool {
        let lower = url.to_lowercase();
        REDIRECT_DENYLIST.iter().any(|d| lower.contains(d))
            || self.extra_domains.iter().any(|d| lower.contains(d.as_str()))
    }

    /// Navigation target for a record; never "#", empty, or non-http
    pub fn resolve(&self, record: &VideoRecord) -> String {
        let external = usable(record.external_url.as_deref()).filter(|url| match self.strategy {
            UrlStrategy::PreferExternal => true,
            UrlStrategy::SkipRedirects => !self.is_redirect(url),
        });

        external
            .or_else(|| usable(record.detail_url.as_deref()))
            .filter(|url| is_http(url))
            .map(str::to_string)
            .unwrap_or_else(|| self.fallback_url.clone())
    }
}

/// Trimmed link, or None when absent, blank or "#"
fn usable(url: Option<&str>) -> Option<&str> {
    url.map(str::trim).filter(|u| !u.is_empty() && *u != "#")
}

/// True for http:// and https:// URLs, any case
pub fn is_http(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Whether a record has anything to link to at all
pub fn has_link(record: &VideoRecord) -> bool {
    let external = record
        .external_url
        .as_deref()
        .is_some_and(|u| !u.trim().is_empty());
    external || usable(record.detail_url.as_deref()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(detail: Option<&str>, external: Option<&str>) -> VideoRecord {
        VideoRecord {
            title: Some("X".into()),
            thumbnail: Some("https://img/good.jpg".into()),
            detail_url: detail.map(Into::into),
            external_url: external.map(Into::into),
            categories: None,
        }
    }

    fn resolver(strategy: UrlStrategy) -> LinkResolver {
        LinkResolver::new(strategy, DEFAULT_FALLBACK_URL)
    }

    #[test]
    fn test_both_disqualified_uses_fallback() {
        let rec = record(Some("#"), Some(""));
        for strategy in [UrlStrategy::PreferExternal, UrlStrategy::SkipRedirects] {
            assert_eq!(resolver(strategy).resolve(&rec), DEFAULT_FALLBACK_URL);
        }
        assert_eq!(
            resolver(UrlStrategy::SkipRedirects).resolve(&VideoRecord::default()),
            DEFAULT_FALLBACK_URL
        );
    }

    #[test]
    fn test_prefers_external() {
        let rec = record(Some("https://site.test/v/1"), Some("https://host.test/watch/1"));
        assert_eq!(
            resolver(UrlStrategy::PreferExternal).resolve(&rec),
            "https://host.test/watch/1"
        );
    }

    #[test]
    fn test_redirect_domain_handling() {
        let rec = record(Some("https://site.test/v/1"), Some("https://bit.ly/abc"));
        assert_eq!(
            resolver(UrlStrategy::SkipRedirects).resolve(&rec),
            "https://site.test/v/1"
        );
        assert_eq!(
            resolver(UrlStrategy::PreferExternal).resolve(&rec),
            "https://bit.ly/abc"
        );

        // Nothing else to fall back on
        let rec = record(Some("#"), Some("https://BIT.LY/abc"));
        assert_eq!(
            resolver(UrlStrategy::SkipRedirects).resolve(&rec),
            DEFAULT_FALLBACK_URL
        );
    }

    #[test]
    fn test_extra_domains() {
        let r = resolver(UrlStrategy::SkipRedirects)
            .with_extra_domains(&["  Tracker.Test ".to_string(), String::new()]);
        let rec = record(Some("https://site.test/v/1"), Some("https://tracker.test/go"));
        assert_eq!(r.resolve(&rec), "https://site.test/v/1");
    }

    #[test]
    fn test_non_http_candidate_uses_fallback() {
        let rec = record(None, Some("ftp://host.test/file"));
        assert_eq!(
            resolver(UrlStrategy::PreferExternal).resolve(&rec),
            DEFAULT_FALLBACK_URL
        );
        let rec = record(Some("/relative/path"), None);
        assert_eq!(
            resolver(UrlStrategy::SkipRedirects).resolve(&rec),
            DEFAULT_FALLBACK_URL
        );
    }

    #[test]
    fn test_resolved_url_is_always_http() {
        let values = [None, Some(""), Some("   "), Some("#"), Some("javascript:x"), Some("https://ok.test/")];
        for strategy in [UrlStrategy::PreferExternal, UrlStrategy::SkipRedirects] {
            let r = resolver(strategy);
            for d in values {
                for e in values {
                    let url = r.resolve(&record(d, e));
                    assert!(is_http(&url), "{url:?}");
                    assert_ne!(url, "#");
                }
            }
        }
    }

    #[test]
    fn test_unusable_fallback_is_replaced() {
        let rec = record(Some("#"), Some(""));
        for fallback in ["#", "", "   ", "/home", "javascript:void(0)"] {
            let r = LinkResolver::new(UrlStrategy::SkipRedirects, fallback);
            assert_eq!(r.resolve(&rec), DEFAULT_FALLBACK_URL, "{fallback:?}");
        }

        let r = LinkResolver::new(UrlStrategy::PreferExternal, " https://mirror.test/ ");
        assert_eq!(r.resolve(&rec), "https://mirror.test/");
    }

    #[test]
    fn test_has_link() {
        assert!(has_link(&record(None, Some("https://host.test/1"))));
        assert!(has_link(&record(Some("https://site.test/1"), None)));
        assert!(!has_link(&record(Some("#"), Some("  "))));
        assert!(!has_link(&VideoRecord::default()));
    }
}
