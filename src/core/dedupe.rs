//! Duplicate removal
//!
//! Keys are exact strings; nothing is trimmed or case-folded.

use std::collections::HashSet;

use crate::types::{DedupeMode, VideoRecord};

const KEY_SEPARATOR: &str = "|";

/// title|thumbnail|detail_url|external_url, absent fields as ""
pub fn dedup_key(record: &VideoRecord) -> String {
    [
        record.title.as_deref(),
        record.thumbnail.as_deref(),
        record.detail_url.as_deref(),
        record.external_url.as_deref(),
    ]
    .map(|f| f.unwrap_or(""))
    .join(KEY_SEPARATOR)
}

/// [`dedup_key`] followed by the comma-joined categories
pub fn strict_dedup_key(record: &VideoRecord) -> String {
    let categories = record
        .categories
        .as_deref()
        .map(|c| c.join(","))
        .unwrap_or_default();
    format!("{}{}{}", dedup_key(record), KEY_SEPARATOR, categories)
}

/// Stable first-seen filter over `records`
pub fn dedupe(records: &[VideoRecord], mode: DedupeMode) -> Vec<VideoRecord> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());

    records
        .iter()
        .filter(|record| match mode {
            DedupeMode::Standard => seen.insert(dedup_key(record)),
            DedupeMode::Strict => {
                let full = strict_dedup_key(record);
                let simple = dedup_key(record);
                if seen.contains(&full) || seen.contains(&simple) {
                    return false;
                }
                seen.insert(full);
                seen.insert(simple);
                true
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(title: &str, thumb: &str, cats: &[&str]) -> VideoRecord {
        VideoRecord {
            title: Some(title.into()),
            thumbnail: Some(thumb.into()),
            detail_url: Some("https://site.test/v".into()),
            external_url: None,
            categories: Some(cats.iter().map(|c| c.to_string()).collect()),
        }
    }

    #[test]
    fn test_dedup_key_absent_fields() {
        assert_eq!(dedup_key(&VideoRecord::default()), "|||");
        let rec = video("A", "t", &["x", "y"]);
        assert_eq!(dedup_key(&rec), "A|t|https://site.test/v|");
        assert_eq!(strict_dedup_key(&rec), "A|t|https://site.test/v||x,y");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut second = video("A", "t1", &["x"]);
        second.categories = Some(vec!["other".into()]);
        let input = vec![video("A", "t1", &["x"]), video("B", "t1", &[]), second];

        let out = dedupe(&input, DedupeMode::Standard);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], input[0]);
        assert_eq!(out[1].title.as_deref(), Some("B"));
    }

    #[test]
    fn test_thumbnail_difference_is_distinct() {
        let input = vec![video("A", "https://img/1.jpg", &[]), video("A", "https://img/2.jpg", &[])];
        assert_eq!(dedupe(&input, DedupeMode::Standard).len(), 2);
        assert_eq!(dedupe(&input, DedupeMode::Strict).len(), 2);
    }

    #[test]
    fn test_keys_are_exact() {
        let input = vec![video("A", "t", &[]), video("a", "t", &[]), video("A ", "t", &[])];
        assert_eq!(dedupe(&input, DedupeMode::Standard).len(), 3);
    }

    #[test]
    fn test_strict_rejects_on_simple_key() {
        // Full keys differ by tags; the shared simple key rejects the second
        let input = vec![video("A", "t", &["x"]), video("A", "t", &["y"])];
        assert_eq!(dedupe(&input, DedupeMode::Strict).len(), 1);
    }

    #[test]
    fn test_strict_is_at_least_as_aggressive() {
        let input = vec![
            video("A", "t", &["x"]),
            video("A", "t", &["x"]),
            video("A", "t", &["y"]),
            video("B", "t", &[]),
        ];
        let standard = dedupe(&input, DedupeMode::Standard);
        let strict = dedupe(&input, DedupeMode::Strict);
        assert!(strict.len() <= standard.len());
    }

    #[test]
    fn test_dedupe_idempotent() {
        let input = vec![
            video("A", "t", &["x"]),
            video("A", "t", &["y"]),
            video("A", "t", &["x"]),
            VideoRecord::default(),
            VideoRecord::default(),
            video("B", "u", &[]),
        ];
        for mode in [DedupeMode::Standard, DedupeMode::Strict] {
            let once = dedupe(&input, mode);
            assert_eq!(dedupe(&once, mode), once);
        }
    }

    #[test]
    fn test_input_untouched() {
        let input = vec![video("A", "t", &[]), video("A", "t", &[])];
        let before = input.clone();
        let _ = dedupe(&input, DedupeMode::Strict);
        assert_eq!(input, before);
    }
}
