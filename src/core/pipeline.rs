//! Normalization pipeline
//!
//! link filter -> title/thumbnail filter -> dedupe -> normalize.
//! Every stage borrows its input and returns a fresh collection.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::dedupe::dedupe;
use crate::core::links::{LinkResolver, has_link};
use crate::core::thumbnail;
use crate::types::{
    Config, DedupeMode, NormalizedVideo, PLACEHOLDER_THUMBNAIL, ThumbnailPolicy, UNTITLED_VIDEO,
    UntitledPolicy, VideoRecord,
};

/// Records with a non-blank title and a thumbnail passing `policy`
pub fn filter_valid(records: &[VideoRecord], policy: ThumbnailPolicy) -> Vec<VideoRecord> {
    records
        .iter()
        .filter(|r| r.trimmed_title().is_some())
        .filter(|r| thumbnail::is_valid(r.thumbnail.as_deref(), policy))
        .cloned()
        .collect()
}

/// Configured pipeline, built once per run or per session
#[derive(Debug, Clone)]
pub struct Pipeline {
    thumbnail_policy: ThumbnailPolicy,
    dedupe_mode: DedupeMode,
    untitled: UntitledPolicy,
    require_link: bool,
    filter_invalid: bool,
    resolver: LinkResolver,
}

impl Pipeline {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            thumbnail_policy: cfg.thumbnail_policy,
            dedupe_mode: cfg.dedupe_mode,
            untitled: cfg.untitled,
            require_link: cfg.require_link,
            filter_invalid: cfg.filter_invalid,
            resolver: LinkResolver::new(cfg.url_strategy, cfg.fallback_url.clone())
                .with_extra_domains(&cfg.extra_redirect_domains),
        }
    }

    /// Render-safe form of one record, or None under the drop policy
    pub fn normalize(&self, record: &VideoRecord) -> Option<NormalizedVideo> {
        let title = match (record.trimmed_title(), self.untitled) {
            (Some(t), _) => t.to_string(),
            (None, UntitledPolicy::Default) => UNTITLED_VIDEO.to_string(),
            (None, UntitledPolicy::Drop) => return None,
        };

        let thumbnail = match record.thumbnail.as_deref() {
            Some(t) if thumbnail::is_valid(Some(t), self.thumbnail_policy) => t.trim().to_string(),
            _ => PLACEHOLDER_THUMBNAIL.to_string(),
        };

        Some(NormalizedVideo {
            title,
            thumbnail,
            resolved_url: self.resolver.resolve(record),
            categories: record.categories.clone(),
        })
    }

    /// Run every stage over `records`
    pub fn run(&self, records: &[VideoRecord]) -> Vec<NormalizedVideo> {
        let start = Instant::now();

        let linked: Vec<VideoRecord> = if self.require_link {
            records.iter().filter(|r| has_link(r)).cloned().collect()
        } else {
            records.to_vec()
        };
        debug!(input = records.len(), kept = linked.len(), "link_filter");

        let valid = if self.filter_invalid {
            filter_valid(&linked, self.thumbnail_policy)
        } else {
            linked
        };
        debug!(kept = valid.len(), policy = ?self.thumbnail_policy, "validity_filter");

        let unique = dedupe(&valid, self.dedupe_mode);
        debug!(kept = unique.len(), mode = ?self.dedupe_mode, "dedupe");

        let videos: Vec<NormalizedVideo> =
            unique.iter().filter_map(|r| self.normalize(r)).collect();

        info!(
            input = records.len(),
            output = videos.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "pipeline_run"
        );
        videos
    }
}

/// Link and field coverage of a catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub with_external_url: usize,
    pub with_detail_url: usize,
    pub with_both_urls: usize,
    pub without_urls: usize,
    /// Linked records missing a title or thumbnail
    pub missing_fields: usize,
    pub valid: usize,
}

impl CatalogStats {
    pub fn collect(records: &[VideoRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Default::default()
        };

        for record in records {
            let external = record
                .external_url
                .as_deref()
                .is_some_and(|u| !u.trim().is_empty());
            let detail = record
                .detail_url
                .as_deref()
                .is_some_and(|u| !u.trim().is_empty() && u != "#");

            if external {
                stats.with_external_url += 1;
            }
            if detail {
                stats.with_detail_url += 1;
            }
            if external && detail {
                stats.with_both_urls += 1;
            }
            if !external && !detail {
                stats.without_urls += 1;
                continue;
            }

            let thumb = record
                .thumbnail
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty());
            if record.trimmed_title().is_none() || !thumb {
                stats.missing_fields += 1;
            } else {
                stats.valid += 1;
            }
        }

        stats
    }
}
