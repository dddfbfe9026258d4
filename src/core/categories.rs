//! Category counting and view narrowing

use std::collections::HashMap;

use crate::types::{CategoryCount, NormalizedVideo, VideoRecord};

/// Pseudo-category that selects every video
pub const ALL_VIDEOS: &str = "All Videos";

/// Count tags across records, most used first.
///
/// Names are counted as written; blank names are skipped. Equal counts keep
/// the order in which the names first appeared.
pub fn aggregate_categories<'a, I>(categories: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = Option<&'a [String]>>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for name in categories.into_iter().flatten().flatten() {
        if name.trim().is_empty() {
            continue;
        }
        match index.get(name.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(name.as_str(), counts.len());
                counts.push(CategoryCount {
                    name: name.clone(),
                    count: 1,
                });
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// [`aggregate_categories`] over raw records
pub fn aggregate_records(records: &[VideoRecord]) -> Vec<CategoryCount> {
    aggregate_categories(records.iter().map(|r| r.categories.as_deref()))
}

/// [`aggregate_categories`] over pipeline output
pub fn aggregate_videos(videos: &[NormalizedVideo]) -> Vec<CategoryCount> {
    aggregate_categories(videos.iter().map(|v| v.categories.as_deref()))
}

/// First `n` entries of a sorted tally
pub fn top(counts: &[CategoryCount], n: usize) -> &[CategoryCount] {
    &counts[..n.min(counts.len())]
}

/// Videos tagged `name`, case-insensitively.
///
/// Untagged videos match on title instead.
pub fn filter_by_category(videos: &[NormalizedVideo], name: &str) -> Vec<NormalizedVideo> {
    if name == ALL_VIDEOS {
        return videos.to_vec();
    }
    let needle = name.to_lowercase();

    videos
        .iter()
        .filter(|v| match &v.categories {
            Some(cats) => cats.iter().any(|c| c.to_lowercase() == needle),
            None => v.title.to_lowercase().contains(&needle),
        })
        .cloned()
        .collect()
}

/// Videos whose title or any tag contains `query`, case-insensitively
pub fn search(videos: &[NormalizedVideo], query: &str) -> Vec<NormalizedVideo> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return videos.to_vec();
    }

    videos
        .iter()
        .filter(|v| {
            v.title.to_lowercase().contains(&needle)
                || v
                    .categories
                    .as_ref()
                    .is_some_and(|cats| cats.iter().any(|c| c.to_lowercase().contains(&needle)))
        })
        .cloned()
        .collect()
}
